mod extract;
pub use extract::ExtractApp;

mod patterns;
pub use patterns::PatternsApp;
