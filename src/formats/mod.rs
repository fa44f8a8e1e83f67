pub mod xaml;

// Reexporting the format for easier access
pub use xaml::Format as XamlFormat;
