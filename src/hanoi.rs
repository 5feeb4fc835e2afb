use std::fmt::{Display, Formatter};

use itertools::Itertools;
use strum::{Display as StrumDisplay, VariantArray};

use crate::puzzle::{Color, Puzzle, StateKey};

/// Index of one of the three towers.
pub type Tower = usize;
/// Size of a disk; 1 is the smallest.
pub type Disk = u8;

/// A move of the top disk from one tower to another.
#[derive(Copy, Clone, VariantArray, StrumDisplay, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum HanoiMove {
    #[strum(to_string = "0->1")]
    ZeroToOne,
    #[strum(to_string = "0->2")]
    ZeroToTwo,
    #[strum(to_string = "1->0")]
    OneToZero,
    #[strum(to_string = "1->2")]
    OneToTwo,
    #[strum(to_string = "2->0")]
    TwoToZero,
    #[strum(to_string = "2->1")]
    TwoToOne,
}

impl HanoiMove {
    /// Source and destination towers.
    pub fn towers(&self) -> (Tower, Tower) {
        match self {
            Self::ZeroToOne => (0, 1),
            Self::ZeroToTwo => (0, 2),
            Self::OneToZero => (1, 0),
            Self::OneToTwo => (1, 2),
            Self::TwoToZero => (2, 0),
            Self::TwoToOne => (2, 1),
        }
    }

    /// The move between a pair of distinct towers, if any.
    pub fn between(from: Tower, to: Tower) -> Option<Self> {
        Self::VARIANTS.iter().find(|mv| mv.towers() == (from, to)).copied()
    }
}

/// The Tower of Hanoi with three towers.
///
/// Each tower is stored bottom to top, so the last element is the disk that may move.
/// The goal is to gather every disk on the third tower.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Hanoi {
    towers: [Vec<Disk>; 3],
    disks: Disk,
}

impl Hanoi {
    /// All `disks` stacked on the first tower, largest at the bottom.
    pub fn new(disks: Disk) -> Self {
        Self {
            towers: [(1..=disks).rev().collect_vec(), Vec::new(), Vec::new()],
            disks,
        }
    }

    /// Build an arbitrary position. Towers are given bottom to top.
    ///
    /// Returns [`None`] unless the towers hold each of `1..=n` exactly once and no disk sits on a smaller one.
    pub fn from_towers(towers: [Vec<Disk>; 3]) -> Option<Self> {
        let disks = towers.iter().map(Vec::len).sum::<usize>();
        let disks = Disk::try_from(disks).ok()?;

        let all = towers.iter().flatten().copied().sorted().collect_vec();
        if all != (1..=disks).collect_vec() {
            return None;
        }

        if towers.iter().any(|tower| tower.iter().tuple_windows().any(|(below, above)| above > below)) {
            return None;
        }

        Some(Self { towers, disks })
    }

    pub fn disks(&self) -> Disk {
        self.disks
    }

    pub fn tower(&self, tower: Tower) -> &[Disk] {
        &self.towers[tower]
    }

    /// The disk that would move from `tower`, if it holds any.
    pub fn top(&self, tower: Tower) -> Option<Disk> {
        self.towers[tower].last().copied()
    }

    /// Every move that is legal from this position.
    pub fn legal_moves(&self) -> Vec<HanoiMove> {
        HanoiMove::VARIANTS.iter()
            .filter(|mv| self.apply(**mv).is_some())
            .copied()
            .collect_vec()
    }
}

impl Puzzle for Hanoi {
    type Move = HanoiMove;

    fn apply(&self, mv: HanoiMove) -> Option<Self> {
        let (from, to) = mv.towers();
        let disk = self.top(from)?;

        if self.top(to).is_some_and(|target| disk >= target) {
            return None;
        }

        let mut next = self.clone();
        next.towers[from].pop();
        next.towers[to].push(disk);
        Some(next)
    }

    fn key(&self) -> StateKey {
        StateKey::new(self.towers.iter().map(|tower| tower.iter().join(",")).join("|"))
    }

    fn is_goal(&self) -> bool {
        self.towers[0].is_empty() && self.towers[1].is_empty() && self.towers[2].len() == usize::from(self.disks)
    }

    fn node_color(&self) -> Color {
        Color::named("black")
    }

    fn edge_color(_mv: HanoiMove) -> Color {
        Color::named("white")
    }
}

impl Display for Hanoi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for tower in &self.towers {
            writeln!(f, "|{}", tower.iter().join(" "))?;
        }

        Ok(())
    }
}
