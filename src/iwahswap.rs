use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use itertools::Itertools;
use ndarray::{arr2, Array2};
use strum::{Display as StrumDisplay, VariantArray};

use crate::puzzle::{Color, Puzzle, StateKey};

/// Number of cells on the board, which is also the number of rod positions.
pub const CELLS: usize = 6;

/// A piece on the board; 0 is the blank.
pub type Piece = u8;

/// Moves on the board and of the rod, in exploration order.
#[derive(Copy, Clone, VariantArray, StrumDisplay, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum IwahswapMove {
    /// The piece above the blank slides down into it.
    #[strum(to_string = "slide down")]
    SlideDown,
    /// The piece below the blank slides up into it.
    #[strum(to_string = "slide up")]
    SlideUp,
    /// The blank trades places with the piece two cells below, passing a notch.
    #[strum(to_string = "jump up")]
    JumpUp,
    /// The blank trades places with the piece two cells above, passing a notch.
    #[strum(to_string = "jump down")]
    JumpDown,
    #[strum(to_string = "rotate cw")]
    RotateCw,
    #[strum(to_string = "rotate ccw")]
    RotateCcw,
}

impl IwahswapMove {
    fn is_jump(&self) -> bool {
        matches!(self, Self::JumpUp | Self::JumpDown)
    }

    fn is_rotation(&self) -> bool {
        matches!(self, Self::RotateCw | Self::RotateCcw)
    }
}

/// The physical description of an Iwahswap: rod values, ribs and notches.
///
/// `ribs` and `notches` are indexed `[cell, rod position]`. A zero entry means nothing is there.
/// A rib blocks any slide through its cell and forbids rotating onto it unless the piece in the cell carries the rib's value.
/// A notch lets a piece with the same value be jumped over.
#[derive(Clone, Debug, PartialEq)]
pub struct IwahswapRules {
    pub rods: [i8; CELLS],
    pub ribs: Array2<Piece>,
    pub notches: Array2<Piece>,
    /// Fill colors keyed by the absolute rod value.
    pub palette: [&'static str; CELLS],
    pub start_board: [Piece; CELLS],
    pub goal_board: [Piece; CELLS],
    /// Rod value showing in the start position.
    pub start_rod: i8,
}

impl Default for IwahswapRules {
    fn default() -> Self {
        Self {
            rods: [-4, -3, -2, 1, 2, 3],
            ribs: arr2(&[
                // -4 -3 -2  1  2  3
                [0, 0, 0, 0, 1, 1],
                [0, 0, 0, 0, 0, 2],
                [0, 0, 0, 0, 0, 0],
                [3, 0, 0, 0, 0, 0],
                [2, 2, 0, 0, 0, 0],
                [1, 1, 1, 0, 0, 0],
            ]),
            notches: arr2(&[
                // -4 -3 -2  1  2  3
                [0, 0, 0, 0, 0, 0],
                [4, 3, 2, 1, 0, 0],
                [0, 0, 0, 1, 0, 0],
                [0, 0, 2, 1, 2, 0],
                [0, 0, 0, 1, 0, 3],
                [0, 0, 0, 0, 0, 0],
            ]),
            palette: ["black", "red", "orange", "yellow", "green", "blue"],
            start_board: [0, 1, 2, 3, 4, 5],
            goal_board: [0, 5, 4, 3, 2, 1],
            start_rod: 1,
        }
    }
}

impl IwahswapRules {
    /// Rod position at which `value` shows.
    pub fn rod_position(&self, value: i8) -> Option<usize> {
        self.rods.iter().position(|rod| *rod == value)
    }

    #[inline]
    fn rib(&self, cell: usize, rod: usize) -> Piece {
        self.ribs[[cell, rod]]
    }

    #[inline]
    fn notch(&self, cell: usize, rod: usize) -> Piece {
        self.notches[[cell, rod]]
    }
}

/// The Iwahswap rotating-rod puzzle: reverse the five pieces while the rod gates what may move.
#[derive(Clone)]
pub struct Iwahswap {
    board: [Piece; CELLS],
    rod: usize,
    rules: Rc<IwahswapRules>,
}

impl Iwahswap {
    /// The start position described by `rules`.
    ///
    /// If the start rod value is missing from the rod table the rod starts at position 0.
    pub fn new(rules: Rc<IwahswapRules>) -> Self {
        let rod = rules.rod_position(rules.start_rod).unwrap_or(0);
        Self {
            board: rules.start_board,
            rod,
            rules,
        }
    }

    /// An arbitrary position. Returns [`None`] unless `board` is a permutation of `0..6` and `rod` is in range.
    pub fn with_position(rules: Rc<IwahswapRules>, board: [Piece; CELLS], rod: usize) -> Option<Self> {
        let pieces = board.iter().copied().sorted().collect_vec();
        if pieces != (0..CELLS as Piece).collect_vec() || rod >= CELLS {
            return None;
        }

        Some(Self { board, rod, rules })
    }

    pub fn board(&self) -> &[Piece; CELLS] {
        &self.board
    }

    /// Current rod position, an index into [`IwahswapRules::rods`].
    pub fn rod(&self) -> usize {
        self.rod
    }

    pub fn rod_value(&self) -> i8 {
        self.rules.rods[self.rod]
    }

    pub fn rules(&self) -> &Rc<IwahswapRules> {
        &self.rules
    }

    fn blank(&self) -> usize {
        // the board is always a permutation containing exactly one blank
        self.board.iter().position(|piece| *piece == 0).unwrap_or(0)
    }

    fn slide(&self, src: usize, dst: usize) -> Option<Self> {
        if self.rules.rib(src, self.rod) != 0 || self.rules.rib(dst, self.rod) != 0 {
            return None;
        }

        let mut next = self.clone();
        next.board.swap(src, dst);
        Some(next)
    }

    fn jump(&self, blank: usize, over: usize, to: usize) -> Option<Self> {
        if self.rules.notch(over, self.rod) != self.board[over] {
            return None;
        }

        let mut next = self.clone();
        next.board.swap(blank, to);
        Some(next)
    }

    fn rotate_to(&self, rod: usize) -> Option<Self> {
        let blocked = self.board.iter().enumerate().any(|(cell, piece)| {
            let rib = self.rules.rib(cell, rod);
            *piece != 0 && rib != 0 && *piece != rib
        });
        if blocked {
            return None;
        }

        let mut next = self.clone();
        next.rod = rod;
        Some(next)
    }
}

impl Default for Iwahswap {
    fn default() -> Self {
        Self::new(Rc::new(IwahswapRules::default()))
    }
}

impl PartialEq for Iwahswap {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.rod == other.rod
    }
}

impl Eq for Iwahswap {}

impl Hash for Iwahswap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.rod.hash(state);
    }
}

impl Debug for Iwahswap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iwahswap")
            .field("board", &self.board)
            .field("rod", &self.rod)
            .finish()
    }
}

impl Puzzle for Iwahswap {
    type Move = IwahswapMove;

    fn apply(&self, mv: IwahswapMove) -> Option<Self> {
        let blank = self.blank();

        match mv {
            IwahswapMove::SlideDown => {
                let above = blank.checked_sub(1)?;
                self.slide(above, blank)
            }
            IwahswapMove::SlideUp => {
                if blank + 1 >= CELLS {
                    return None;
                }
                self.slide(blank + 1, blank)
            }
            IwahswapMove::JumpUp => {
                if blank + 2 >= CELLS {
                    return None;
                }
                self.jump(blank, blank + 1, blank + 2)
            }
            IwahswapMove::JumpDown => {
                let to = blank.checked_sub(2)?;
                self.jump(blank, blank - 1, to)
            }
            IwahswapMove::RotateCw => self.rotate_to((self.rod + 1) % CELLS),
            IwahswapMove::RotateCcw => self.rotate_to((self.rod + CELLS - 1) % CELLS),
        }
    }

    fn key(&self) -> StateKey {
        StateKey::new(format!("{}-{}", self.board.iter().join(","), self.rod))
    }

    fn is_goal(&self) -> bool {
        self.board == self.rules.goal_board
    }

    fn node_color(&self) -> Color {
        let shade = usize::from(self.rod_value().unsigned_abs());
        Color::named(self.rules.palette.get(shade).copied().unwrap_or("white"))
    }

    fn edge_color(mv: IwahswapMove) -> Color {
        if mv.is_jump() {
            Color::named("rgba(0, 150, 255, 0.8)")
        } else if mv.is_rotation() {
            Color::named("rgba(255, 255, 0, 0.8)")
        } else {
            Color::named("rgba(255, 255, 255, 0.3)")
        }
    }
}

impl Display for Iwahswap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "rod {}", self.rod_value())?;
        for (cell, piece) in self.board.iter().enumerate() {
            let rib = self.rules.rib(cell, self.rod);
            let notch = self.rules.notch(cell, self.rod);
            writeln!(f, "{}{}{}",
                     if *piece == 0 { '.' } else { char::from(b'0' + piece) },
                     if rib != 0 { '#' } else { ' ' },
                     if notch != 0 { char::from(b'0' + notch) } else { ' ' })?;
        }

        Ok(())
    }
}
