pub mod ast;
pub mod builder;
pub mod error;
pub mod export;
pub mod lexer;
pub mod model;
pub mod observer;
pub mod parser;
pub mod resolver;
pub mod torfile;
pub mod utils;

pub use error::TorError;
pub use export::{export_tor_file, export_tor_to_json};
pub use model::{Entity, MemberKind, MemberValue, Members, Payload, Ref, Sequence, Struct, TorComment, TorMember, TorObject, Value};
pub use observer::{BuildObserver, NoopObserver, TracingObserver};
pub use resolver::RefSite;
pub use torfile::{DuplicatePolicy, NameIssue, ReadOptions, TorFile};
