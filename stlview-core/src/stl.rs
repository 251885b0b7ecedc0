/// STL decoding for binary and ASCII formats
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle, Vertex};

/// Binary layout: 80-byte header, u32 triangle count, then 50 bytes per
/// triangle (normal, three vertices, attribute byte count).
const BINARY_HEADER_LEN: usize = 84;
const BINARY_RECORD_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    Truncated(usize),

    #[error("unexpected end of file in triangle record {0}")]
    RecordOverrun(usize),

    #[error("malformed ascii stl: {0}")]
    Ascii(String),
}

/// Decode an STL file, auto-detecting the format. Files beginning with
/// `solid` are tried as ASCII first; anything that fails that grammar is
/// retried as binary, since binary exporters are free to write `solid`
/// into their header.
pub fn parse_stl(data: &[u8]) -> Result<Mesh, ParseError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }
    parse_binary_stl(data)
}

/// Decode a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, ParseError> {
    if data.len() < BINARY_HEADER_LEN {
        return Err(ParseError::Truncated(data.len()));
    }

    let triangle_count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let body = &data[BINARY_HEADER_LEN..];

    let mut mesh = Mesh::with_capacity(triangle_count);
    for (index, record) in body.chunks(BINARY_RECORD_LEN).take(triangle_count).enumerate() {
        if record.len() < BINARY_RECORD_LEN {
            return Err(ParseError::RecordOverrun(index));
        }

        let f = |offset: usize| {
            f32::from_le_bytes([
                record[offset],
                record[offset + 1],
                record[offset + 2],
                record[offset + 3],
            ])
        };

        let (nx, ny, nz) = (f(0), f(4), f(8));
        let vertex = |base: usize| Vertex::new(f(base), f(base + 4), f(base + 8), nx, ny, nz);
        mesh.add_triangle(Triangle::new(vertex(12), vertex(24), vertex(36)));
        // trailing 2 attribute bytes are ignored
    }

    if mesh.triangles.len() < triangle_count {
        return Err(ParseError::RecordOverrun(mesh.triangles.len()));
    }

    Ok(mesh)
}

/// Decode an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, ParseError> {
    match parse_solid(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(ParseError::Ascii(e.to_string())),
    }
}

fn parse_solid(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional solid name: everything up to the end of the line.
    let (input, _) = take_till(|c| c == '\n')(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = parse_vertex(input, normal)?;
    let (input, v1) = parse_vertex(input, normal)?;
    let (input, v2) = parse_vertex(input, normal)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(v0, v1, v2)))
}

fn parse_vertex(input: &str, normal: (f32, f32, f32)) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Vertex::new(x, y, z, normal.0, normal.1, normal.2)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}
