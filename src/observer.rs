//! Hooks into model building.
//!
//! The builder reports each entity and member it creates to a
//! [`BuildObserver`] handed to it by the caller, so tracing output is chosen
//! per call rather than switched on for the whole process.

use tracing::{debug, trace, warn};

use crate::model::{TorComment, TorMember, TorObject};

pub trait BuildObserver {
    /// An object finished building, members included.
    fn object(&mut self, _object: &TorObject) {}

    fn comment(&mut self, _comment: &TorComment) {}

    /// `path` is dotted from the owning object, e.g. `Secondary_coor.origin.z`.
    fn member(&mut self, _path: &str, _member: &TorMember) {}

    /// A name was seen again and the later definition replaced the earlier one.
    fn duplicate(&mut self, _name: &str, _offset: usize) {}
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

/// Forwards build events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl BuildObserver for TracingObserver {
    fn object(&mut self, object: &TorObject) {
        debug!(
            name = object.name(),
            type_name = object.type_name(),
            members = object.len(),
            "built object"
        );
    }

    fn comment(&mut self, comment: &TorComment) {
        trace!(offset = comment.offset(), lines = comment.lines().len(), "built comment block");
    }

    fn member(&mut self, path: &str, member: &TorMember) {
        trace!(path, kind = %member.kind(), "built member");
    }

    fn duplicate(&mut self, name: &str, offset: usize) {
        warn!(name, offset, "duplicate name, later definition replaces the earlier one");
    }
}
