#[cfg(feature = "hashbrown")]
use hashbrown::{hash_map::DefaultHashBuilder as PropertyHasher, HashSet};

#[cfg(not(feature = "hashbrown"))]
use std::collections::{hash_map::RandomState as PropertyHasher, HashSet};

#[cfg(feature = "std")]
use std::{
    io,
    string::{String, ToString},
    vec::Vec,
};

#[cfg(not(feature = "std"))]
use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use core::fmt;
use indexmap::IndexMap;

use crate::qmap::view::PropertyView;

pub type ValidationResult = core::result::Result<(), String>;

type PropertyMap = IndexMap<String, String, PropertyHasher>;

/// Renders a record as MAP text into a byte sink.
///
/// The text is identical to the record's `Display` output.
#[cfg(feature = "std")]
pub trait Writes: fmt::Display {
    fn write_to<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", self)
    }
}

/// Checks that a record can be written out and read back unchanged.
pub trait CheckWritable {
    fn check_writable(&self) -> ValidationResult;
}

/// Plane point of a brush face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "( {} {} {} )", self.x, self.y, self.z)
    }
}

impl CheckWritable for Point {
    fn check_writable(&self) -> ValidationResult {
        [self.x, self.y, self.z].check_writable()
    }
}

/// Texture projection axis: a direction plus an offset along it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Axis {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub offset: f64,
}

impl Axis {
    pub const fn new(x: f64, y: f64, z: f64, offset: f64) -> Self {
        Self { x, y, z, offset }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[ {} {} {} {} ]",
            self.x, self.y, self.z, self.offset
        )
    }
}

impl CheckWritable for Axis {
    fn check_writable(&self) -> ValidationResult {
        [self.x, self.y, self.z, self.offset].check_writable()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Transform {
    pub const fn new(rotation: f64, scale_x: f64, scale_y: f64) -> Self {
        Self {
            rotation,
            scale_x,
            scale_y,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.rotation, self.scale_x, self.scale_y)
    }
}

impl CheckWritable for Transform {
    fn check_writable(&self) -> ValidationResult {
        [self.rotation, self.scale_x, self.scale_y].check_writable()
    }
}

/// Ordered key/value pairs of an entity.
///
/// Iteration and output follow insertion order.  Setting an existing key
/// replaces its value in place.
#[derive(Clone, Debug, Default)]
pub struct Properties {
    map: PropertyMap,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when the key is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn view(&self, key: &str) -> PropertyView<'_> {
        PropertyView::new(self.get(key))
    }

    pub fn set<K: Into<String>, V: ToString>(&mut self, key: K, value: V) {
        self.map.insert(key.into(), value.to_string());
    }

    pub fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Order is significant, unlike IndexMap's own equality
impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.map.len() == other.map.len() && self.map.iter().eq(other.map.iter())
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (key, value) in &self.map {
            writeln!(f, "\"{}\" \"{}\"", key, value)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl Writes for Properties {}

impl CheckWritable for Properties {
    fn check_writable(&self) -> ValidationResult {
        for (k, v) in &self.map {
            validate_keyvalue(k)?;
            validate_keyvalue(v)?;
        }

        Ok(())
    }
}

/// One bounding plane of a brush along with its texturing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub point1: Point,
    pub point2: Point,
    pub point3: Point,
    pub texture: String,
    pub axis_u: Axis,
    pub axis_v: Axis,
    pub transform: Transform,
}

impl Face {
    pub fn new<T: Into<String>>(
        points: [Point; 3],
        texture: T,
        axes: [Axis; 2],
        transform: Transform,
    ) -> Self {
        let [point1, point2, point3] = points;
        let [axis_u, axis_v] = axes;

        Self {
            point1,
            point2,
            point3,
            texture: texture.into(),
            axis_u,
            axis_v,
            transform,
        }
    }

    pub fn plane_points(&self) -> [Point; 3] {
        [self.point1, self.point2, self.point3]
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.point1,
            self.point2,
            self.point3,
            self.texture,
            self.axis_u,
            self.axis_v,
            self.transform
        )
    }
}

#[cfg(feature = "std")]
impl Writes for Face {}

impl CheckWritable for Face {
    fn check_writable(&self) -> ValidationResult {
        for point in self.plane_points() {
            point.check_writable()?;
        }

        validate_texture(&self.texture)?;
        self.axis_u.check_writable()?;
        self.axis_v.check_writable()?;
        self.transform.check_writable()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Brush {
    faces: Vec<Face>,
}

impl Brush {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> impl Iterator<Item = &mut Face> + '_ {
        self.faces.iter_mut()
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    pub fn face_mut(&mut self, index: usize) -> Option<&mut Face> {
        self.faces.get_mut(index)
    }

    pub fn faces_matching<'a, P>(
        &'a self,
        mut predicate: P,
    ) -> impl Iterator<Item = &'a Face> + 'a
    where
        P: FnMut(&Face) -> bool + 'a,
    {
        self.faces.iter().filter(move |face| predicate(*face))
    }

    pub fn faces_with_texture<'a>(
        &'a self,
        texture: &'a str,
    ) -> impl Iterator<Item = &'a Face> + 'a {
        self.faces_matching(move |face| face.texture == texture)
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn remove_face(&mut self, index: usize) -> Option<Face> {
        (index < self.faces.len()).then(|| self.faces.remove(index))
    }

    pub fn clear_faces(&mut self) {
        self.faces.clear();
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

impl FromIterator<Face> for Brush {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        Self {
            faces: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Brush {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{")?;

        for face in &self.faces {
            writeln!(f, "{}", face)?;
        }

        writeln!(f, "}}")
    }
}

#[cfg(feature = "std")]
impl Writes for Brush {}

impl CheckWritable for Brush {
    fn check_writable(&self) -> ValidationResult {
        for face in &self.faces {
            face.check_writable()?;
        }

        Ok(())
    }
}

/// Property-bearing object of a level.
///
/// Point entities carry no brushes, solid entities carry one or more.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    properties: Properties,
    brushes: Vec<Brush>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Shorthand for the `classname` property.
    pub fn classname(&self) -> Option<&str> {
        self.properties.get("classname")
    }

    pub fn brushes(&self) -> &[Brush] {
        &self.brushes
    }

    pub fn brushes_mut(&mut self) -> impl Iterator<Item = &mut Brush> + '_ {
        self.brushes.iter_mut()
    }

    pub fn brush(&self, index: usize) -> Option<&Brush> {
        self.brushes.get(index)
    }

    pub fn brush_mut(&mut self, index: usize) -> Option<&mut Brush> {
        self.brushes.get_mut(index)
    }

    pub fn add_brush(&mut self, brush: Brush) {
        self.brushes.push(brush);
    }

    pub fn remove_brush(&mut self, index: usize) -> Option<Brush> {
        (index < self.brushes.len()).then(|| self.brushes.remove(index))
    }

    pub fn clear_brushes(&mut self) {
        self.brushes.clear();
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_point(&self) -> bool {
        self.brushes.is_empty()
    }

    pub fn is_solid(&self) -> bool {
        !self.is_point()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{{")?;
        write!(f, "{}", self.properties)?;

        for (index, brush) in self.brushes.iter().enumerate() {
            writeln!(f, "// Brush {}", index)?;
            write!(f, "{}", brush)?;
        }

        writeln!(f, "}}")
    }
}

#[cfg(feature = "std")]
impl Writes for Entity {}

impl CheckWritable for Entity {
    fn check_writable(&self) -> ValidationResult {
        self.properties.check_writable()?;

        for brush in &self.brushes {
            brush.check_writable()?;
        }

        Ok(())
    }
}

/// Root of a MAP document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Level {
    entities: Vec<Entity>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.iter_mut()
    }

    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    pub fn entities_matching<'a, P>(
        &'a self,
        mut predicate: P,
    ) -> impl Iterator<Item = &'a Entity> + 'a
    where
        P: FnMut(&Entity) -> bool + 'a,
    {
        self.entities.iter().filter(move |ent| predicate(*ent))
    }

    pub fn entities_by_classname<'a>(
        &'a self,
        classname: &'a str,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities_matching(move |ent| ent.classname() == Some(classname))
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn remove_entity(&mut self, index: usize) -> Option<Entity> {
        (index < self.entities.len()).then(|| self.entities.remove(index))
    }

    /// Keeps only the entities for which `predicate` returns `true`.
    pub fn retain_entities<P: FnMut(&Entity) -> bool>(&mut self, predicate: P) {
        self.entities.retain(predicate);
    }

    pub fn clear_entities(&mut self) {
        self.entities.clear();
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn to_map_string(&self) -> String {
        self.to_string()
    }
}

impl FromIterator<Entity> for Level {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, entity) in self.entities.iter().enumerate() {
            writeln!(f, "// Entity {}", index)?;
            write!(f, "{}", entity)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl Writes for Level {}

impl CheckWritable for Level {
    fn check_writable(&self) -> ValidationResult {
        for ent in &self.entities {
            ent.check_writable()?;
        }

        Ok(())
    }
}

impl<const N: usize> CheckWritable for [f64; N] {
    fn check_writable(&self) -> ValidationResult {
        for num in self {
            num.check_writable()?;
        }

        Ok(())
    }
}

impl CheckWritable for f64 {
    fn check_writable(&self) -> ValidationResult {
        if self.is_finite() {
            Ok(())
        } else {
            Err(format!("Non-finite number ({})", *self))
        }
    }
}

fn validate_keyvalue(s: &str) -> ValidationResult {
    let bad_chars: HashSet<u8> = [b'"', b'\r', b'\n'].iter().copied().collect();
    validate_chars(s, &bad_chars)
}

fn validate_texture(s: &str) -> ValidationResult {
    if s.is_empty() {
        return Err(String::from("Empty texture name"));
    }

    if matches!(s, "(" | ")" | "[" | "]") {
        return Err(format!("Texture name is a lone bracket ({})", s));
    }

    let bad_chars: HashSet<u8> =
        [b'"', b' ', b'\t', b'\r', b'\n'].iter().copied().collect();
    validate_chars(s, &bad_chars)
}

fn validate_chars(s: &str, bad_chars: &HashSet<u8>) -> ValidationResult {
    for ch in s.bytes() {
        if bad_chars.contains(&ch) {
            return Err(format!(
                "Illegal character ({:?}) in {:?}",
                char::from(ch),
                s
            ));
        }
    }

    Ok(())
}
