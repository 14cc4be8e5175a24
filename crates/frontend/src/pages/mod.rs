pub mod arrow_functions;

pub use arrow_functions::ArrowFunctionsPage;
