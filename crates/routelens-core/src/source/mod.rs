//! FileSource implementations: local disk, GitHub contents API, in-memory.

pub mod glob_match;
pub mod local;
pub mod memory;
pub mod remote;

pub use local::LocalFileSource;
pub use memory::MemoryFileSource;
pub use remote::{
    ContentsResponse, ContentsTransport, EntryKind, GitHubFileSource, HttpTransport, RemoteCaches,
    RemoteEntry, RepoRef,
};
