// Author: Dustin Pilgrim
// License: MIT

//! On-demand lookup of `ref(...)` targets.
//!
//! Reading a file never resolves references. These helpers are for consumers
//! that want to follow them, possibly across several files (a project file
//! plus a shared library file, say).

use crate::model::{Entity, Members, MemberValue, Ref, TorObject};
use crate::torfile::TorFile;
use crate::TorError;

/// One `ref(...)` found in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSite {
    /// Dotted path of the member holding the ref, e.g. `Primary_M1.coor_sys`.
    pub path: String,
    pub target: String,
}

impl TorFile {
    pub fn resolve(&self, r: &Ref) -> Option<&Entity> {
        self.entity(r.target())
    }

    pub fn resolve_object(&self, r: &Ref) -> Option<&TorObject> {
        self.object(r.target())
    }

    /// Follow the ref stored at `path` to the object it names.
    pub fn follow(&self, path: &str) -> Result<&TorObject, TorError> {
        let r = self.value_at(path)?.as_reference().ok_or_else(|| TorError::TypeError {
            message: format!("Path '{}' does not hold a ref", path),
            hint: None,
            code: Some(405),
        })?;

        self.resolve_object(r).ok_or_else(|| TorError::NotFound {
            path: r.target().to_string(),
            hint: Some(format!("'{}' refers to an object not defined in this file", path)),
            code: Some(404),
        })
    }

    /// Every ref in the file, in document order.
    pub fn references(&self) -> Vec<RefSite> {
        let mut sites = Vec::new();
        for object in self.objects() {
            collect_members(&mut sites, object.name(), object.members());
        }
        sites
    }

    /// Refs whose target is not defined in this file. Not an error in itself:
    /// the target may live in another file.
    pub fn dangling_refs(&self) -> Vec<RefSite> {
        self.references()
            .into_iter()
            .filter(|site| self.object(&site.target).is_none())
            .collect()
    }
}

impl Ref {
    /// Look the target up in each file in turn; the first definition wins.
    pub fn resolve_in<'f>(&self, files: &[&'f TorFile]) -> Option<&'f TorObject> {
        files.iter().find_map(|file| file.object(self.target()))
    }
}

fn collect_members(sites: &mut Vec<RefSite>, owner: &str, members: &Members) {
    for member in members {
        let path = format!("{}.{}", owner, member.name());
        collect_value(sites, &path, member.value());
    }
}

fn collect_value(sites: &mut Vec<RefSite>, path: &str, value: &MemberValue) {
    match value {
        MemberValue::Ref(r) => sites.push(RefSite {
            path: path.to_string(),
            target: r.target().to_string(),
        }),
        MemberValue::Sequence(seq) => {
            for (i, item) in seq.iter().enumerate() {
                collect_value(sites, &format!("{}.{}", path, i), item);
            }
        }
        MemberValue::Struct(s) => collect_members(sites, path, s.members()),
        MemberValue::Value(_) => {}
    }
}
