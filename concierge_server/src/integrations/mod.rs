//! Thin clients for the two outbound providers: the chat-completion service behind the guest
//! assistant, and the weather service. Both are opaque collaborators; nothing here retries or
//! circuit-breaks, and provider failures collapse into a single error per request.
pub mod assistant;
pub mod weather;

pub use assistant::{AssistantApi, AssistantApiError};
pub use weather::{WeatherApi, WeatherApiError, WeatherReport};
