//! Deep merging of configuration fragments.

use serde_json::Value as J;

/// Merge `overlay` into `base` with deep object merging.
///
/// Objects merge recursively; arrays and scalars from the overlay replace
/// the base value wholesale; a null overlay keeps the base value. Used to
/// lay a seed's own fragments over the run-level common fragments.
pub fn merge_values(base: &mut J, overlay: J) {
    match (base, overlay) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_values(a.entry(k).or_insert(J::Null), v);
            }
        }
        // Policy: arrays are replaced wholesale
        (a @ J::Array(_), J::Array(b)) => *a = J::Array(b),
        (_, J::Null) => { /* keep left if right is null */ }
        (a, b) => *a = b,
    }
}
