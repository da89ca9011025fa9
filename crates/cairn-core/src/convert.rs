//! Conversions between the resolver's tree and the lockfile's on-disk
//! representation.

use indexmap::IndexMap;

use cairn_error::Result;
use cairn_lock::LockedPackage;
use cairn_naming::parse_source;
use cairn_resolver::ResolvedPackage;

#[must_use]
pub fn tree_to_locked(tree: &IndexMap<String, ResolvedPackage>) -> IndexMap<String, LockedPackage> {
    tree.iter()
        .map(|(name, package)| {
            (
                name.clone(),
                LockedPackage {
                    version: package.version.clone(),
                    source: package.source.to_string(),
                    dependencies: tree_to_locked(&package.dependencies),
                },
            )
        })
        .collect()
}

pub fn locked_to_tree(
    locked: &IndexMap<String, LockedPackage>,
) -> Result<IndexMap<String, ResolvedPackage>> {
    locked
        .iter()
        .map(|(name, package)| {
            let source = parse_source(&package.source)?;
            Ok((
                name.clone(),
                ResolvedPackage {
                    name: name.clone(),
                    version: package.version.clone(),
                    source,
                    dependencies: locked_to_tree(&package.dependencies)?,
                },
            ))
        })
        .collect()
}
