//! Broad-phase collision detection using sweep and prune

use crate::config::SweepAxis;
use crate::shapes::Aabb;
use crate::types::BodyHandle;

/// One body as seen by the broad phase. `aabb == None` marks an unbounded
/// body (a plane), which is paired with every bounded proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proxy {
    pub handle: BodyHandle,
    pub aabb: Option<Aabb>,
}

/// Resolve [`SweepAxis`] to a coordinate index. `Auto` picks the axis along
/// which the bounded proxies' centres have the largest variance.
pub fn choose_axis(axis: SweepAxis, proxies: &[Proxy]) -> usize {
    match axis {
        SweepAxis::X => 0,
        SweepAxis::Y => 1,
        SweepAxis::Z => 2,
        SweepAxis::Auto => {
            let centers: Vec<_> = proxies.iter().filter_map(|p| p.aabb).map(|a| a.center()).collect();
            if centers.len() < 2 {
                return 0;
            }
            let n = centers.len() as f32;
            let mean = centers.iter().copied().sum::<glam::Vec3>() / n;
            let variance = centers
                .iter()
                .map(|c| (*c - mean) * (*c - mean))
                .sum::<glam::Vec3>();
            if variance.x >= variance.y && variance.x >= variance.z {
                0
            } else if variance.y >= variance.z {
                1
            } else {
                2
            }
        }
    }
}

/// Collect candidate pairs whose bounds overlap.
///
/// Bounded proxies are sorted along `axis` and swept; every unbounded proxy is
/// paired with every bounded one. `accept` filters pairs before they are
/// emitted. Pairs come out as `(low, high)` handles, sorted and deduplicated,
/// so the result does not depend on the input order.
pub fn sweep_and_prune<F>(
    proxies: &[Proxy],
    axis: usize,
    mut accept: F,
    pairs: &mut Vec<(BodyHandle, BodyHandle)>,
) where
    F: FnMut(BodyHandle, BodyHandle) -> bool,
{
    pairs.clear();

    let mut bounded: Vec<(BodyHandle, Aabb)> = proxies
        .iter()
        .filter_map(|p| p.aabb.map(|a| (p.handle, a)))
        .collect();
    bounded.sort_by(|(ha, a), (hb, b)| {
        a.min[axis]
            .total_cmp(&b.min[axis])
            .then_with(|| ha.cmp(hb))
    });

    for (i, (ha, a)) in bounded.iter().enumerate() {
        for (hb, b) in &bounded[i + 1..] {
            if b.min[axis] > a.max[axis] {
                break;
            }
            if a.overlaps(b) {
                push_pair(*ha, *hb, &mut accept, pairs);
            }
        }
    }

    for unbounded in proxies.iter().filter(|p| p.aabb.is_none()) {
        for (hb, _) in &bounded {
            push_pair(unbounded.handle, *hb, &mut accept, pairs);
        }
    }

    pairs.sort_unstable();
    pairs.dedup();
}

fn push_pair<F>(a: BodyHandle, b: BodyHandle, accept: &mut F, pairs: &mut Vec<(BodyHandle, BodyHandle)>)
where
    F: FnMut(BodyHandle, BodyHandle) -> bool,
{
    if a == b {
        return;
    }
    let pair = if a < b { (a, b) } else { (b, a) };
    if accept(pair.0, pair.1) {
        pairs.push(pair);
    }
}
