//! Deterministic variant filenames.
//!
//! Affine variants list their present fields in declaration order
//! (`scale-<pct>`, then `rotate-<deg>`) joined by `-`; perspective variants
//! are `perspective-type-<edge>-scale-<strength>`. The suffix is appended to
//! the source file stem, before the extension.

use std::path::{Path, PathBuf};

use crate::transform::TransformDescriptor;

/// Filename suffix for a descriptor.
///
/// An affine descriptor with no fields yields an empty suffix.
pub fn variant_suffix(descriptor: &TransformDescriptor) -> String {
    match descriptor {
        TransformDescriptor::Affine(t) => {
            let mut parts = Vec::with_capacity(2);
            if let Some(scale) = t.scale_percent {
                parts.push(format!("scale-{scale}"));
            }
            if let Some(angle) = t.rotate_degrees {
                parts.push(format!("rotate-{angle}"));
            }
            parts.join("-")
        }
        TransformDescriptor::Perspective(t) => {
            format!("perspective-type-{}-scale-{}", t.edge, t.strength_percent)
        }
    }
}

/// Path of the variant file derived from `base_path`.
///
/// `<dir>/<stem>.<ext>` becomes `<dir>/<stem>-<suffix>.<ext>`; an empty
/// suffix returns `base_path` unchanged.
pub fn variant_path(base_path: &Path, suffix: &str) -> PathBuf {
    if suffix.is_empty() {
        return base_path.to_path_buf();
    }

    let mut name = base_path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push("-");
    name.push(suffix);
    if let Some(ext) = base_path.extension() {
        name.push(".");
        name.push(ext);
    }
    base_path.with_file_name(name)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::transform::Edge;
    use proptest::prelude::*;

    fn descriptor_strategy() -> impl Strategy<Value = TransformDescriptor> {
        prop_oneof![
            (
                prop::option::of(1u32..=100),
                prop::option::of(0u32..360)
            )
                .prop_map(|(s, r)| TransformDescriptor::affine(
                    s.map(f64::from),
                    r.map(f64::from)
                )),
            (prop::sample::select(Edge::ALL.to_vec()), 1u32..=100)
                .prop_map(|(e, s)| TransformDescriptor::perspective(e, s)),
        ]
    }

    proptest! {
        /// Property: distinct descriptors never share a suffix.
        #[test]
        fn prop_suffix_injective(a in descriptor_strategy(), b in descriptor_strategy()) {
            prop_assume!(a != b);
            prop_assert_ne!(variant_suffix(&a), variant_suffix(&b));
        }

        /// Property: suffixes are usable in a single path component.
        #[test]
        fn prop_suffix_is_filename_safe(d in descriptor_strategy()) {
            let suffix = variant_suffix(&d);
            prop_assert!(!suffix.contains('/') && !suffix.contains('.') && !suffix.contains(' '));
        }
    }
}
