use crate::detection::domain::detection_window::DetectionWindow;
use crate::shared::region::FaceRegion;

/// Relative tolerance for the neighbor predicate during clustering.
pub const GROUP_EPS: f32 = 0.2;

/// Collapses raw scan hits into final face regions.
///
/// Hits are partitioned into clusters by transitive closure of the mutual
/// overlap predicate; a cluster survives only if it holds at least
/// `min_neighbors` raw hits, and collapses to the coordinate-wise arithmetic
/// mean of its members. The mean is order-independent, which makes the
/// representative deterministic for identical input regardless of hit order.
///
/// `min_neighbors == 0` bypasses clustering entirely: every raw hit becomes
/// its own region. Output is sorted by `(y, x)` ascending and clamped to the
/// image bounds, so downstream caption numbering is spatially stable.
pub fn group_windows(
    hits: &[DetectionWindow],
    min_neighbors: u32,
    image_width: u32,
    image_height: u32,
) -> Vec<FaceRegion> {
    let mut regions: Vec<FaceRegion> = if min_neighbors == 0 {
        hits.iter()
            .map(|w| clamp_to_bounds(w.x, w.y, w.width, w.height, image_width, image_height))
            .collect()
    } else {
        clusters_of(hits)
            .into_iter()
            .filter(|members| members.len() >= min_neighbors as usize)
            .map(|members| representative(hits, &members, image_width, image_height))
            .collect()
    };

    regions.sort_by_key(|r| (r.y, r.x));
    regions
}

/// Partitions hit indices into clusters via union-find over the
/// pairwise neighbor predicate.
fn clusters_of(hits: &[DetectionWindow]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..hits.len()).collect();

    fn find(parent: &mut Vec<usize>, i: usize) -> usize {
        if parent[i] != i {
            let root = find(parent, parent[i]);
            parent[i] = root;
        }
        parent[i]
    }

    for i in 0..hits.len() {
        for j in (i + 1)..hits.len() {
            if hits[i].is_neighbor(&hits[j], GROUP_EPS) {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    // Attach the later root under the earlier one so cluster
                    // membership order follows insertion order.
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut cluster_of_root = vec![usize::MAX; hits.len()];
    for i in 0..hits.len() {
        let root = find(&mut parent, i);
        if cluster_of_root[root] == usize::MAX {
            cluster_of_root[root] = clusters.len();
            clusters.push(Vec::new());
        }
        clusters[cluster_of_root[root]].push(i);
    }
    clusters
}

/// Coordinate-wise arithmetic mean of the cluster members, rounded.
fn representative(
    hits: &[DetectionWindow],
    members: &[usize],
    image_width: u32,
    image_height: u32,
) -> FaceRegion {
    let n = members.len() as u64;
    let (mut sx, mut sy, mut sw, mut sh) = (0u64, 0u64, 0u64, 0u64);
    for &i in members {
        sx += u64::from(hits[i].x);
        sy += u64::from(hits[i].y);
        sw += u64::from(hits[i].width);
        sh += u64::from(hits[i].height);
    }

    let mean = |sum: u64| ((sum + n / 2) / n) as u32;
    clamp_to_bounds(
        mean(sx),
        mean(sy),
        mean(sw),
        mean(sh),
        image_width,
        image_height,
    )
}

fn clamp_to_bounds(x: u32, y: u32, w: u32, h: u32, image_width: u32, image_height: u32) -> FaceRegion {
    let x = x.min(image_width.saturating_sub(1));
    let y = y.min(image_height.saturating_sub(1));
    FaceRegion::new(x, y, w.min(image_width - x), h.min(image_height - y))
}
