pub mod host;
pub mod outcome;
pub mod request;

pub use host::Host;
pub use outcome::{Classification, Outcome};
pub use request::{Method, ProbeAttempt, Scheme};
