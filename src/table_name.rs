//! Target table extraction from scheduler task ids.
//!
//! Task ids are generated as `<phase>.<script>-TO-<target_table>`, where the
//! phase prefix is the task-group path.

use crate::constants::TARGET_SEPARATOR;

/// Return the target table encoded after the last `-TO-` separator.
///
/// Missing, empty or separator-less ids yield `None`, as does an id ending
/// in the separator.
pub fn extract_target_name(task_id: Option<&str>) -> Option<&str> {
    let task_id = task_id?;
    let (_, target) = task_id.rsplit_once(TARGET_SEPARATOR)?;
    (!target.is_empty()).then_some(target)
}
