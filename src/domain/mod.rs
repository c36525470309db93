pub mod credential;
pub mod events;
pub mod ports;

pub use credential::AuthCredential;
pub use events::{Event, EventVariant};
pub use ports::{EventSink, EventSource, EventStream};
