/*
  Fiddler, a UCI-compatible chess engine.
  Copyright (C) 2022 Clayton Ramsey.

  Fiddler is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Fiddler is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Directions, which form a vector field describing motions between `Square`s.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A difference between two squares. `Direction`s form a vector field, which allows us to define
/// subtraction between squares.
/// Internally, they use the same representation as a `Square` but with a signed integer.
pub struct Direction(pub(crate) i8);

impl Direction {
    /* Cardinal directions */

    /// A step toward higher rank numbers.
    pub const NORTH: Direction = Direction(8);

    /// A step toward lower file indices (file 0 is H, so this steps toward the H-file).
    pub const EAST: Direction = Direction(1);

    /// A step toward lower rank numbers.
    pub const SOUTH: Direction = Direction(-8);

    /// A step toward higher file indices (file 7 is A, so this steps toward the A-file).
    pub const WEST: Direction = Direction(-1);

    /* Composite directions */

    pub const NORTHEAST: Direction = Direction(Direction::NORTH.0 + Direction::EAST.0);
    pub const NORTHWEST: Direction = Direction(Direction::NORTH.0 + Direction::WEST.0);
    pub const SOUTHEAST: Direction = Direction(Direction::SOUTH.0 + Direction::EAST.0);
    pub const SOUTHWEST: Direction = Direction(Direction::SOUTH.0 + Direction::WEST.0);

    /// The directions that a rook can move, along only one step.
    pub const ROOK_DIRECTIONS: [Direction; 4] = [
        Direction::NORTH,
        Direction::SOUTH,
        Direction::EAST,
        Direction::WEST,
    ];

    /// The directions that a bishop can move, along only one step.
    pub const BISHOP_DIRECTIONS: [Direction; 4] = [
        Direction::NORTHEAST,
        Direction::NORTHWEST,
        Direction::SOUTHEAST,
        Direction::SOUTHWEST,
    ];

    /// Is this direction one of the three that bear toward the A-file (`EAST`, `NORTHEAST`,
    /// `SOUTHEAST`)? These are the directions whose source squares on file A must be masked off
    /// before shifting, to suppress wraparound.
    #[inline]
    #[must_use]
    pub(crate) const fn is_east_bearing(self) -> bool {
        self.0 == Direction::EAST.0 || self.0 == Direction::NORTHEAST.0 || self.0 == Direction::SOUTHEAST.0
    }

    /// Is this direction one of the three that bear toward the H-file (`WEST`, `NORTHWEST`,
    /// `SOUTHWEST`)?
    #[inline]
    #[must_use]
    pub(crate) const fn is_west_bearing(self) -> bool {
        self.0 == Direction::WEST.0 || self.0 == Direction::NORTHWEST.0 || self.0 == Direction::SOUTHWEST.0
    }
}
