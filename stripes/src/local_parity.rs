//! Local parity placement on the most loaded group member.

use crate::{Arrangement, GroupId, LoadVector, Symbol};

/// Assigns the local parity of each group to the group member with the highest load.
///
/// Hosting the local parity relieves the chosen disk of one read, so its load is decremented,
/// saturating at zero.
#[derive(Debug, Clone)]
pub struct LocalParityPlacer {
    groups_count: GroupId,
    /// Per group: best load seen so far and the disk it was seen on.
    hosts: Vec<Option<(u32, usize)>>,
}

impl LocalParityPlacer {
    /// Constructs a placer for arrangements with `groups_count` groups.
    #[must_use]
    pub fn new(groups_count: GroupId) -> Self {
        Self {
            groups_count,
            hosts: vec![None; usize::from(groups_count)],
        }
    }

    /// Places local parities in `arrangement` and adjusts `loads` in place.
    ///
    /// Disks are scanned in ascending order, skipping the global parity; on ties, the first disk
    /// wins. Groups with no members in `arrangement` are left alone.
    ///
    /// The group of each disk is read from `arrangement` at that same disk, so disk `d` is
    /// matched with `loads[d]` wherever the global parity sits.
    pub fn place_mut(&mut self, arrangement: &mut Arrangement, loads: &mut LoadVector) {
        debug_assert_eq!(arrangement.len(), loads.len());
        for host in &mut self.hosts {
            *host = None;
        }
        let global_parity = arrangement.global_parity();
        for disk in (0..arrangement.len()).filter(|&disk| Some(disk) != global_parity) {
            if let Some(group) = arrangement[disk].group() {
                let load = loads[disk];
                let host = &mut self.hosts[usize::from(group) - 1];
                match host {
                    Some((best, _)) if *best >= load => {}
                    _ => *host = Some((load, disk)),
                }
            }
        }
        for (group, host) in (1..=self.groups_count).zip(&self.hosts) {
            if let Some((_, disk)) = *host {
                loads[disk] = loads[disk].saturating_sub(1);
                arrangement[disk] = Symbol::LocalParity(group);
            }
        }
    }

    /// Returns copies of `arrangement` and `loads` with local parities placed.
    #[must_use]
    pub fn place(
        &mut self,
        arrangement: &Arrangement,
        loads: &LoadVector,
    ) -> (Arrangement, LoadVector) {
        let mut arrangement = arrangement.clone();
        let mut loads = loads.clone();
        self.place_mut(&mut arrangement, &mut loads);
        (arrangement, loads)
    }
}
