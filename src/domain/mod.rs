// Position payload and validation
pub mod position;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
