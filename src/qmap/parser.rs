use std::{
    io::{BufRead, BufReader, Read},
    num::NonZeroU64,
    slice,
    str::FromStr,
};

use log::{debug, trace};

use crate::qmap;
use qmap::lexer::{face_tokens, property_pair, Line, LineIterator, LineKind};
use qmap::repr::{Axis, Brush, Entity, Face, Level, Point, Transform};

const FACE_FIELDS: [&str; 21] = [
    "x1", "y1", "z1", "x2", "y2", "z2", "x3", "y3", "z3", "texture", "uX",
    "uY", "uZ", "uOffset", "vX", "vY", "vZ", "vOffset", "rotation", "scaleX",
    "scaleY",
];

/// Reads a MAP document into a new `Level`.
pub fn parse<R: Read>(reader: R) -> qmap::Result<Level> {
    let mut level = Level::new();
    parse_into(reader, &mut level)?;
    Ok(level)
}

/// Reads a MAP document into an existing `Level`, discarding its entities
/// first.
///
/// On error the level holds whatever entities were completed before the
/// failure and should not be relied upon.
pub fn parse_into<R: Read>(reader: R, level: &mut Level) -> qmap::Result<()> {
    level.clear_entities();
    let mut lines = LineIterator::new(BufReader::new(reader));

    while let Some(line) = lines.next().transpose()? {
        if line.kind() == LineKind::OpenBrace {
            let entity = parse_entity(&mut lines)?;
            level.add_entity(entity);
        } else {
            debug!("Line {}: skipping `{}`", line.line_number, line.text);
        }
    }

    Ok(())
}

pub fn parse_str(text: &str) -> qmap::Result<Level> {
    parse(text.as_bytes())
}

impl FromStr for Level {
    type Err = qmap::Error;

    fn from_str(text: &str) -> qmap::Result<Level> {
        parse_str(text)
    }
}

fn parse_entity<R: BufRead>(
    lines: &mut LineIterator<R>,
) -> qmap::Result<Entity> {
    let mut entity = Entity::new();

    loop {
        let line = lines.next().transpose()?.ok_or_else(qmap::Error::eof)?;

        match line.kind() {
            LineKind::CloseBrace => break,
            LineKind::OpenBrace => entity.add_brush(parse_brush(lines)?),
            LineKind::Property => match property_pair(&line.text) {
                Some((key, value)) => entity.properties_mut().set(key, value),
                None => debug!(
                    "Line {}: skipping malformed property `{}`",
                    line.line_number, line.text
                ),
            },
            LineKind::Face | LineKind::Other => {
                debug!("Line {}: skipping `{}`", line.line_number, line.text);
            }
        }
    }

    trace!(
        "Entity {:?} with {} brush(es)",
        entity.classname(),
        entity.brush_count()
    );

    Ok(entity)
}

fn parse_brush<R: BufRead>(lines: &mut LineIterator<R>) -> qmap::Result<Brush> {
    let mut brush = Brush::new();

    loop {
        let line = lines.next().transpose()?.ok_or_else(qmap::Error::eof)?;

        match line.kind() {
            LineKind::CloseBrace => break,
            LineKind::Face => brush.add_face(parse_face(&line)?),
            _ => {
                debug!("Line {}: skipping `{}`", line.line_number, line.text);
            }
        }
    }

    trace!("Brush with {} face(s)", brush.face_count());

    Ok(brush)
}

fn parse_face(line: &Line) -> qmap::Result<Face> {
    let tokens = face_tokens(&line.text);

    if tokens.len() > FACE_FIELDS.len() {
        debug!(
            "Line {}: ignoring {} trailing face token(s)",
            line.line_number,
            tokens.len() - FACE_FIELDS.len()
        );
    }

    let mut fields = FaceFields::new(&tokens, line.line_number);

    let point1 = fields.point()?;
    let point2 = fields.point()?;
    let point3 = fields.point()?;
    let texture = fields.text()?;
    let axis_u = fields.axis()?;
    let axis_v = fields.axis()?;
    let transform = fields.transform()?;

    Ok(Face::new(
        [point1, point2, point3],
        texture,
        [axis_u, axis_v],
        transform,
    ))
}

/// Positional cursor over the tokens of one face line.
struct FaceFields<'a> {
    tokens: slice::Iter<'a, &'a str>,
    field: usize,
    token_count: usize,
    line_number: NonZeroU64,
}

impl<'a> FaceFields<'a> {
    fn new(tokens: &'a [&'a str], line_number: NonZeroU64) -> Self {
        Self {
            tokens: tokens.iter(),
            field: 0,
            token_count: tokens.len(),
            line_number,
        }
    }

    fn field_name(&self) -> &'static str {
        FACE_FIELDS.get(self.field).copied().unwrap_or("?")
    }

    fn text(&mut self) -> qmap::Result<&'a str> {
        match self.tokens.next() {
            Some(&token) => {
                self.field += 1;
                Ok(token)
            }
            None => Err(qmap::Error::from_format(
                format!(
                    "Face has {} of {} fields, missing `{}`",
                    self.token_count,
                    FACE_FIELDS.len(),
                    self.field_name()
                ),
                self.line_number,
            )),
        }
    }

    fn float(&mut self) -> qmap::Result<f64> {
        let name = self.field_name();
        let token = self.text()?;

        f64::from_str(token).map_err(|_| {
            qmap::Error::from_numeric(
                format!("Expected number for `{}`, got `{}`", name, token),
                self.line_number,
            )
        })
    }

    fn point(&mut self) -> qmap::Result<Point> {
        Ok(Point::new(self.float()?, self.float()?, self.float()?))
    }

    fn axis(&mut self) -> qmap::Result<Axis> {
        Ok(Axis::new(
            self.float()?,
            self.float()?,
            self.float()?,
            self.float()?,
        ))
    }

    fn transform(&mut self) -> qmap::Result<Transform> {
        Ok(Transform::new(self.float()?, self.float()?, self.float()?))
    }
}
