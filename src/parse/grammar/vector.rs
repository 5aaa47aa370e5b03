use tracing::instrument;

use crate::ast::{Coordinate, CoordinateKind, Vec2, Vec3};
use crate::errors::{ResultExt, SyntaxError, SyntaxErrorKind};
use crate::parse::parser::Parser;

impl Parser<'_, '_> {
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_vec3(&mut self) -> Result<Vec3, SyntaxError> {
        let pos = self.pos();

        let [x, y, z] = self
            .parse_coordinates::<3>(true)
            .context("a 3D vector", pos)?;

        Ok(Vec3 { pos, x, y, z })
    }

    /// Parses a pair of coordinates; rotations pass `allow_local = false`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_vec2(&mut self, allow_local: bool) -> Result<Vec2, SyntaxError> {
        let pos = self.pos();

        let [x, y] = self
            .parse_coordinates::<2>(allow_local)
            .context("a 2D vector", pos)?;

        Ok(Vec2 { pos, x, y })
    }

    fn parse_coordinates<const N: usize>(
        &mut self,
        allow_local: bool,
    ) -> Result<[Coordinate; N], SyntaxError> {
        let mut coordinates: Vec<Coordinate> = Vec::with_capacity(N);

        for idx in 0..N {
            if idx > 0 {
                self.end_argument()?;
            }

            let coordinate = self.parse_coordinate()?;
            let is_local = coordinate.kind == CoordinateKind::Local;

            if is_local && !allow_local {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::LocalCoordinatesNotAllowed,
                    coordinate.pos,
                ));
            }

            if matches!(coordinates.first(), Some(first) if (first.kind == CoordinateKind::Local) != is_local)
            {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::MixedLocalCoordinates,
                    coordinate.pos,
                ));
            }

            coordinates.push(coordinate);
        }

        self.expect_end_of_argument()?;

        coordinates
            .try_into()
            .map_err(|_| SyntaxError::new(SyntaxErrorKind::MissingCoordinate, self.pos()))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_coordinate(&mut self) -> Result<Coordinate, SyntaxError> {
        let pos = self.pos();

        let kind = if self.eat_control("~").is_some() {
            CoordinateKind::Relative
        } else if self.eat_control("^").is_some() {
            CoordinateKind::Local
        } else {
            CoordinateKind::Absolute
        };

        let offset = if self.at_numeral() {
            Some(self.parse_number()?)
        } else if kind == CoordinateKind::Absolute {
            return Err(self.error(SyntaxErrorKind::MissingCoordinate));
        } else {
            None
        };

        Ok(Coordinate { pos, kind, offset })
    }
}
