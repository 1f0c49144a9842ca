//! Live adapters for real external interactions.

pub mod clock;
pub mod github;
pub mod google_auth;
pub mod http;
pub mod sheets;
pub mod template;

pub use clock::SystemClock;
pub use github::GitHubClient;
pub use google_auth::GoogleAuth;
pub use sheets::SheetsClient;
pub use template::PlaceholderTemplate;
