//! Connectivity filtering on labeled voxel volumes. Upstream segmentation
//! produces a region label per voxel (0 = background); the helpers here label
//! binary volumes by 6-connectivity and clear regions that do not reach
//! enough sample faces, the voxel-space analogue of the percolation filter.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::errors::PoreNetError;
use crate::percolation::{Axis, Face};

/// Region labels over a dense 3-D grid, x-fastest row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledVolume {
    dims: [usize; 3],
    labels: Vec<u32>,
}

impl LabeledVolume {
    pub fn new(dims: [usize; 3], labels: Vec<u32>) -> Result<Self, PoreNetError> {
        let expected = dims[0] * dims[1] * dims[2];
        if labels.len() != expected {
            return Err(PoreNetError::invalid_input(format!(
                "label volume of {} voxels does not match dims {dims:?}",
                labels.len()
            )));
        }
        Ok(LabeledVolume { dims, labels })
    }

    /// Labels the connected regions of a binary volume (true = foreground)
    /// by 6-connectivity, in scan order from 1.
    pub fn from_binary(dims: [usize; 3], foreground: &[bool]) -> Result<Self, PoreNetError> {
        let total = dims[0] * dims[1] * dims[2];
        if foreground.len() != total {
            return Err(PoreNetError::invalid_input(format!(
                "binary volume of {} voxels does not match dims {dims:?}",
                foreground.len()
            )));
        }
        let mut labels = vec![0_u32; total];
        let mut next = 0_u32;
        let mut queue = VecDeque::new();
        let plane = dims[0] * dims[1];
        for start in 0..total {
            if !foreground[start] || labels[start] != 0 {
                continue;
            }
            next += 1;
            labels[start] = next;
            queue.push_back(start);
            while let Some(index) = queue.pop_front() {
                let x = index % dims[0];
                let y = (index / dims[0]) % dims[1];
                let z = index / plane;
                let mut visit = |peer: usize| {
                    if foreground[peer] && labels[peer] == 0 {
                        labels[peer] = next;
                        queue.push_back(peer);
                    }
                };
                if x > 0 {
                    visit(index - 1);
                }
                if x + 1 < dims[0] {
                    visit(index + 1);
                }
                if y > 0 {
                    visit(index - dims[0]);
                }
                if y + 1 < dims[1] {
                    visit(index + dims[0]);
                }
                if z > 0 {
                    visit(index - plane);
                }
                if z + 1 < dims[2] {
                    visit(index + plane);
                }
            }
        }
        Ok(LabeledVolume { dims, labels })
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn label_at(&self, x: usize, y: usize, z: usize) -> u32 {
        self.labels[self.index([x, y, z])]
    }

    /// Number of distinct non-background labels present.
    pub fn region_count(&self) -> usize {
        let mut seen = AHashSet::new();
        for &label in &self.labels {
            if label != 0 {
                seen.insert(label);
            }
        }
        seen.len()
    }

    /// Clears every region touching fewer than `min_faces` of the six sample
    /// faces and returns how many regions remain.
    pub fn retain_spanning_labels(&mut self, min_faces: usize) -> usize {
        if min_faces == 0 {
            return self.region_count();
        }
        let mut face_hits: AHashMap<u32, usize> = AHashMap::new();
        for face in Face::ALL {
            for label in self.face_label_set(face) {
                *face_hits.entry(label).or_insert(0) += 1;
            }
        }
        let kept: AHashSet<u32> = face_hits
            .iter()
            .filter(|(_, hits)| **hits >= min_faces)
            .map(|(label, _)| *label)
            .collect();
        self.clear_except(&kept);
        kept.len()
    }

    /// Keeps only the regions present on both boundary faces of `axis` and
    /// returns how many remain.
    pub fn retain_axis_spanning_labels(&mut self, axis: Axis) -> usize {
        let min_side = self.face_label_set(axis.min_face());
        let max_side = self.face_label_set(axis.max_face());
        let kept: AHashSet<u32> = min_side.intersection(&max_side).copied().collect();
        self.clear_except(&kept);
        kept.len()
    }

    fn face_label_set(&self, face: Face) -> AHashSet<u32> {
        let mut found = AHashSet::new();
        let axis = face.axis().index();
        if self.dims[axis] == 0 {
            return found;
        }
        let at_max = matches!(face, Face::XMax | Face::YMax | Face::ZMax);
        let (u, v) = match axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let mut coord = [0_usize; 3];
        coord[axis] = if at_max { self.dims[axis] - 1 } else { 0 };
        for a in 0..self.dims[u] {
            for b in 0..self.dims[v] {
                coord[u] = a;
                coord[v] = b;
                let label = self.labels[self.index(coord)];
                if label != 0 {
                    found.insert(label);
                }
            }
        }
        found
    }

    fn clear_except(&mut self, kept: &AHashSet<u32>) {
        for label in &mut self.labels {
            if *label != 0 && !kept.contains(label) {
                *label = 0;
            }
        }
    }

    fn index(&self, coord: [usize; 3]) -> usize {
        coord[0] + self.dims[0] * (coord[1] + self.dims[1] * coord[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_binary_labels_disjoint_runs() {
        // two foreground runs separated by background along x
        let foreground = [true, true, false, true, false];
        let volume = LabeledVolume::from_binary([5, 1, 1], &foreground).unwrap();
        assert_eq!(volume.labels(), &[1, 1, 0, 2, 0]);
        assert_eq!(volume.region_count(), 2);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(LabeledVolume::new([2, 2, 2], vec![0; 7]).is_err());
    }
}
