//! # Activation Functions
//!
//! Element-wise non-linearities applied after each dense layer of the
//! Q-network.
//!
//! - **ReLU**: `max(0, x)`, the default for hidden layers
//! - **Linear**: identity, used for the value outputs
//! - **Tanh**: bounded alternative for hidden layers
//! - **LeakyReLU**: ReLU with a small negative slope

pub mod functions;

pub use functions::Activation;
