use crate::qmap;
use qmap::parser::{parse, parse_into, parse_str};
use qmap::repr::{Axis, Brush, Entity, Face, Level, Point, Transform};
use std::io;
use std::string::ToString;

const SIMPLE_MAP: &str = "// comment
{
\"classname\" \"worldspawn\"
{
( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) TEX1 [ 1 0 0 0 ] [ 0 1 0 0 ] 0 1 1
}
}
";

const NOISY_MAP: &str = "
// header

   // indented comment
{
// inside entity

\"classname\" \"worldspawn\"
    // before brush
{

// inside brush
( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) TEX1 [ 1 0 0 0 ] [ 0 1 0 0 ] 0 1 1

}
// trailing
}

// footer
";

struct ErroringReader {}

impl ErroringReader {
    fn new() -> Self {
        Self {}
    }
}

impl io::Read for ErroringReader {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "Generic test error"))
    }
}

fn simple_face() -> Face {
    Face::new(
        [
            Point::new(0.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
        ],
        "TEX1",
        [Axis::new(1.0, 0.0, 0.0, 0.0), Axis::new(0.0, 1.0, 0.0, 0.0)],
        Transform::new(0.0, 1.0, 1.0),
    )
}

fn face_line_error(face_line: &str) -> qmap::Error {
    let text = format!("{{\n{{\n{}\n}}\n}}\n", face_line);
    parse_str(&text).err().unwrap()
}

// Parse successes

#[test]
fn parse_empty_map() {
    let level = parse(&b""[..]).unwrap();
    assert_eq!(level.entity_count(), 0);
}

#[test]
fn parse_simple_map() {
    let level = parse_str(SIMPLE_MAP).unwrap();
    assert_eq!(level.entity_count(), 1);

    let ent = level.entity(0).unwrap();
    assert_eq!(ent.properties().len(), 1);
    assert_eq!(ent.classname(), Some("worldspawn"));
    assert_eq!(ent.brush_count(), 1);

    let brush = ent.brush(0).unwrap();
    assert_eq!(brush.faces(), [simple_face()]);
}

#[test]
fn parse_ignores_blank_and_comment_lines() {
    assert_eq!(parse_str(NOISY_MAP).unwrap(), parse_str(SIMPLE_MAP).unwrap());
}

#[test]
fn parse_ignores_stray_top_level_text() {
    let text = format!(
        "\"classname\" \"stray\"\n( 1 2 3 )\nnoise\n{}}}\n",
        SIMPLE_MAP
    );
    let level = parse_str(&text).unwrap();
    assert_eq!(level.entity_count(), 1);
    assert_eq!(level.entity(0).unwrap().classname(), Some("worldspawn"));
}

#[test]
fn parse_point_entities() {
    let text = "{\n\"classname\" \"light\"\n\"origin\" \"0 0 64\"\n}\n\
                {\n\"classname\" \"info_player_start\"\n\"angle\" \"90\"\n}\n";
    let level = parse_str(text).unwrap();

    assert_eq!(level.entity_count(), 2);
    assert!(level.entities().iter().all(Entity::is_point));
    assert_eq!(
        level.entity(1).unwrap().properties().view("angle").as_f64(),
        Some(90.0)
    );
}

#[test]
fn parse_keeps_property_order_and_last_write() {
    let text = "{\n\"z\" \"1\"\n\"a\" \"2\"\n\"m\" \"\"\n\"a\" \"3\"\n}\n";
    let level = parse_str(text).unwrap();
    let props = level.entity(0).unwrap().properties();

    let pairs: std::vec::Vec<(&str, &str)> = props.iter().collect();
    assert_eq!(pairs, [("z", "1"), ("a", "3"), ("m", "")]);
}

#[test]
fn parse_property_with_spaces_and_tabs() {
    let text = "{\n\t\"message\"\t\"Welcome to the  pit\"\n}\n";
    let level = parse_str(text).unwrap();
    assert_eq!(
        level.entity(0).unwrap().properties().get("message"),
        Some("Welcome to the  pit")
    );
}

#[test]
fn parse_crlf_and_signed_numbers() {
    let text = "{\r\n{\r\n( -1.5 +2 3e2 ) ( 0 1 0 ) ( 1 0 0 ) \
                *lava1 [ 0 -1 0 -8.25 ] [ 0 0 -1 16 ] -90 0.5 0.5\r\n\
                }\r\n}\r\n";
    let level = parse_str(text).unwrap();
    let face = &level.entities()[0].brushes()[0].faces()[0];

    assert_eq!(face.point1, Point::new(-1.5, 2.0, 300.0));
    assert_eq!(face.texture, "*lava1");
    assert_eq!(face.axis_u, Axis::new(0.0, -1.0, 0.0, -8.25));
    assert_eq!(face.axis_v, Axis::new(0.0, 0.0, -1.0, 16.0));
    assert_eq!(face.transform, Transform::new(-90.0, 0.5, 0.5));
}

#[test]
fn parse_ignores_surplus_face_tokens() {
    let text = "{\n{\n( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) TEX1 \
                [ 1 0 0 0 ] [ 0 1 0 0 ] 0 1 1 0 0 0\n}\n}\n";
    let level = parse_str(text).unwrap();
    assert_eq!(level.entities()[0].brushes()[0].faces(), [simple_face()]);
}

#[test]
fn parse_into_clears_target() {
    let mut level = parse_str(SIMPLE_MAP).unwrap();
    level.add_entity(Entity::new());
    assert_eq!(level.entity_count(), 2);

    parse_into(SIMPLE_MAP.as_bytes(), &mut level).unwrap();
    assert_eq!(level.entity_count(), 1);

    parse_into(&b"// nothing\n"[..], &mut level).unwrap();
    assert_eq!(level.entity_count(), 0);
}

#[test]
fn parse_from_str_trait() {
    let level: Level = SIMPLE_MAP.parse().unwrap();
    assert_eq!(level.entity_count(), 1);
}

#[test]
fn roundtrip_programmatic_level() {
    let mut brush = Brush::new();
    brush.add_face(simple_face());

    let mut odd = simple_face();
    odd.point2 = Point::new(-0.1, 1e-7, 12345.678);
    odd.texture = "{FENCE".to_string();
    odd.axis_v = Axis::new(0.0, 0.0, -1.0, 0.3);
    odd.transform = Transform::new(33.3, -0.5, 2.25);
    brush.add_face(odd);

    let mut world = Entity::new();
    world.properties_mut().set("classname", "worldspawn");
    world.properties_mut().set("wad", "gfx/base.wad");
    world.add_brush(brush.clone());
    world.add_brush(brush);

    let mut light = Entity::new();
    light.properties_mut().set("origin", "0 0 0");
    light.properties_mut().set("classname", "light");
    light.properties_mut().set("", "");

    let level: Level = [world, light, Entity::new()].into_iter().collect();

    let text = level.to_map_string();
    let reparsed = parse_str(&text).unwrap();

    assert_eq!(reparsed, level);
    assert_eq!(reparsed.to_map_string(), text);
}

#[test]
fn roundtrip_reformats_comments() {
    let level = parse_str(SIMPLE_MAP).unwrap();
    let text = level.to_map_string();

    assert!(text.starts_with("// Entity 0\n{\n"));
    assert!(text.contains("// Brush 0\n"));
    assert!(!text.contains("// comment"));
    assert_eq!(parse_str(&text).unwrap(), level);
}

// Parse errors

#[test]
fn parse_short_face_line() {
    let err = face_line_error("( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) TEX1 [ 1 0 0 0 ]");

    if let qmap::Error::Format(line_err) = err {
        assert_eq!(u64::from(line_err.line_number.unwrap()), 3u64);
        assert!(line_err.message.contains("vX"));
    } else {
        panic!("Unexpected error variant for {}", err);
    }
}

#[test]
fn parse_face_line_without_texture() {
    let err = face_line_error("( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 )");
    assert!(matches!(err, qmap::Error::Format(_)));
    assert!(err.to_string().contains("texture"));
}

#[test]
fn parse_non_numeric_face_field() {
    let err = face_line_error(
        "( 0 0 zero ) ( 0 1 0 ) ( 1 0 0 ) TEX1 [ 1 0 0 0 ] [ 0 1 0 0 ] 0 1 1",
    );

    if let qmap::Error::Numeric(line_err) = err {
        assert_eq!(u64::from(line_err.line_number.unwrap()), 3u64);
        assert!(line_err.message.contains("z1"));
        assert!(line_err.message.contains("zero"));
    } else {
        panic!("Unexpected error variant for {}", err);
    }
}

#[test]
fn parse_misplaced_texture() {
    let err = face_line_error(
        "( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) [ 1 0 0 0 ] TEX1 [ 0 1 0 0 ] 0 1 1",
    );
    assert!(matches!(err, qmap::Error::Numeric(_)));
}

#[test]
fn parse_skips_malformed_property() {
    let text = "{\n\"classname\" \"worldspawn\"\n\"broken\" value\n\
                \"wad\n\"sounds\" \"4\"\n}\n";
    let level = parse_str(text).unwrap();
    assert_eq!(level.entity_count(), 1);

    let props = level.entity(0).unwrap().properties();
    let pairs: std::vec::Vec<(&str, &str)> = props.iter().collect();
    assert_eq!(pairs, [("classname", "worldspawn"), ("sounds", "4")]);
    assert!(!props.has("broken"));
}

#[test]
fn parse_unterminated_entity() {
    let err = parse_str("{\n\"classname\" \"worldspawn\"\n").err().unwrap();
    assert_eq!(err, qmap::Error::eof());
    assert_eq!(err.line_number(), None);
}

#[test]
fn parse_unterminated_brush() {
    let text = "{\n{\n( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) TEX1 \
                [ 1 0 0 0 ] [ 0 1 0 0 ] 0 1 1\n}\n";
    let err = parse_str(text).err().unwrap();
    assert_eq!(err, qmap::Error::eof());
}

#[test]
fn parse_error_leaves_target_cleared() {
    let mut level = parse_str(SIMPLE_MAP).unwrap();
    let text = format!("{}{{\n\"classname\" \"light\"\n", SIMPLE_MAP);

    assert!(parse_into(text.as_bytes(), &mut level).is_err());
    assert_eq!(level.entity_count(), 1);
}

#[test]
fn parse_io_error() {
    let reader = ErroringReader::new();
    let err = parse(reader).err().unwrap();
    if let qmap::Error::Io(_) = err {
    } else {
        panic!("Unexpected error variant for {}", err);
    }
}
