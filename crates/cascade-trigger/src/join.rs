//! Join evaluation.

use cascade_core::build::Build;
use cascade_core::ids::JobId;
use cascade_core::pipeline::JoinSource;
use std::collections::HashSet;

/// Whether a join is satisfied: every job in `join_spec` has at least one
/// SUCCESS build among `finished_builds`. Order-independent and tolerant of
/// multiple builds per job (distinct job ids are what count). Non-success
/// terminal builds do not satisfy a member; the join simply stays pending.
pub fn is_join_done(join_spec: &[JoinSource], finished_builds: &[Build]) -> bool {
    let succeeded: HashSet<JobId> = finished_builds
        .iter()
        .filter(|b| b.is_success())
        .map(|b| b.job_id)
        .collect();

    join_spec.iter().all(|source| succeeded.contains(&source.job_id))
}
