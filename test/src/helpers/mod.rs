pub mod login;
pub mod session;

pub use handlers::{CallLog, CallPhase, LoggedCall, RecordingHandler};
pub use login::{admit_client, test_server_config};
pub use random::ScriptedRandomSource;
pub use session::FakeGameSession;
