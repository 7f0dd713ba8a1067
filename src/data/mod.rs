mod backend;
mod plan;
mod signals;

pub use backend::{BackendError, GenerationBackend};
pub use plan::{ActionFailure, ActionResult, PlannedAction};
pub use signals::{CodeBlock, DirectoryToken, FenceLanguage, FilenameToken, TokenSet};
