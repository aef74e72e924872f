//! Iterative ray walking through the direction-relation graph.
//!
//! A ray entering a tile looks up the direction it came from and continues
//! along the related direction(s): straight ahead on ordinary tiles, one or
//! two ways at a pentagon. Tracing happens once while the pattern table is
//! built; move generation never touches the graph.

use crate::board::tile::TileId;
use crate::board::topology::Topology;

/// Tiles a ray continues to after stepping from `last` into `current`.
fn next_tiles(topology: &Topology, last: TileId, current: TileId) -> Vec<TileId> {
    let tile = topology.tile(current);
    let Some(from) = tile.direction_to(last) else {
        return Vec::new();
    };
    tile.continuations(from)
        .into_iter()
        .filter_map(|d| tile.neighbor(d))
        .collect()
}

struct Frame {
    last: TileId,
    current: TileId,
    remaining: usize,
    path: Vec<TileId>,
}

/// Every maximal path starting with the step `origin -> first`, at most
/// `limit` tiles long. A branch ends at the board edge or when it would run
/// back into `origin`. Branches after a pentagon are returned as separate
/// rays that repeat the common prefix.
pub fn trace_rays(topology: &Topology, origin: TileId, first: TileId, limit: usize) -> Vec<Vec<TileId>> {
    let mut rays = Vec::new();
    if limit == 0 || first == origin {
        return rays;
    }

    let mut stack = vec![Frame {
        last: origin,
        current: first,
        remaining: limit,
        path: Vec::new(),
    }];

    while let Some(mut frame) = stack.pop() {
        frame.path.push(frame.current);

        let children: Vec<TileId> = if frame.remaining > 1 {
            next_tiles(topology, frame.last, frame.current)
                .into_iter()
                .filter(|t| *t != origin)
                .collect()
        } else {
            Vec::new()
        };

        if children.is_empty() {
            rays.push(frame.path);
            continue;
        }

        for child in children.into_iter().rev() {
            stack.push(Frame {
                last: frame.current,
                current: child,
                remaining: frame.remaining - 1,
                path: frame.path.clone(),
            });
        }
    }

    rays
}

/// Depth-first visiting order of the same walk, without stopping at any
/// particular tile. Knight patterns are defined in terms of this order.
pub fn trace_preorder(topology: &Topology, last: TileId, current: TileId, limit: usize) -> Vec<TileId> {
    let mut out = Vec::new();
    if limit == 0 {
        return out;
    }

    let mut stack = vec![(last, current, limit)];
    while let Some((last, current, remaining)) = stack.pop() {
        out.push(current);
        if remaining > 1 {
            for child in next_tiles(topology, last, current).into_iter().rev() {
                stack.push((current, child, remaining - 1));
            }
        }
    }
    out
}
