//! Typed in-memory representation of a Tor file.
//!
//! Every collection here keeps insertion order: the order objects and members
//! appear in a file is part of its content and is reproduced on write.

mod member;
mod object;
mod value;

pub use member::{Members, Struct, TorMember};
pub use object::{Entity, TorComment, TorObject};
pub use value::{MemberKind, MemberValue, Payload, Ref, Sequence, Value};
