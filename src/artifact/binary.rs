//! Little-endian point-sequence codec.
//!
//! A sequence is a `u32` point count followed by that many `(f32 x, f32 y)`
//! pairs. Files hold sequences back to back with no names or padding.
use crate::error::{TrackError, TrackResult};
use crate::types::Point;
use std::io::{self, Read, Write};

/// Write one sequence.
pub fn write_sequence<W: Write>(writer: &mut W, points: &[Point]) -> io::Result<()> {
    let count = u32::try_from(points.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "sequence longer than u32::MAX"))?;
    writer.write_all(&count.to_le_bytes())?;
    for p in points {
        writer.write_all(&p.x.to_le_bytes())?;
        writer.write_all(&p.y.to_le_bytes())?;
    }
    Ok(())
}

/// Write sequences in order.
pub fn write_sequences<W: Write>(writer: &mut W, sequences: &[&[Point]]) -> io::Result<()> {
    for seq in sequences {
        write_sequence(writer, seq)?;
    }
    Ok(())
}

/// Encode sequences into a fresh buffer.
pub fn encode(sequences: &[&[Point]]) -> TrackResult<Vec<u8>> {
    let total: usize = sequences.iter().map(|s| 4 + 8 * s.len()).sum();
    let mut buf = Vec::with_capacity(total);
    write_sequences(&mut buf, sequences).map_err(|e| TrackError::InvalidArtifact(e.to_string()))?;
    Ok(buf)
}

/// Decode `expected` sequences, or every sequence up to a clean end of data
/// when `expected` is `None`. Truncated or trailing bytes are rejected.
pub fn decode(bytes: &[u8], expected: Option<usize>) -> TrackResult<Vec<Vec<Point>>> {
    let mut cursor = bytes;
    let mut out = Vec::new();
    loop {
        if expected.is_some_and(|n| out.len() == n) {
            if !cursor.is_empty() {
                return Err(TrackError::InvalidArtifact(format!(
                    "{} trailing bytes after {} sequence(s)",
                    cursor.len(),
                    out.len()
                )));
            }
            return Ok(out);
        }
        if cursor.is_empty() {
            return match expected {
                Some(n) => Err(TrackError::InvalidArtifact(format!(
                    "expected {n} sequence(s), found {}",
                    out.len()
                ))),
                None => Ok(out),
            };
        }
        out.push(read_sequence(&mut cursor)?);
    }
}

/// Read one sequence from a reader; truncation is an error.
pub fn read_sequence<R: Read>(reader: &mut R) -> TrackResult<Vec<Point>> {
    let mut word = [0u8; 4];
    reader
        .read_exact(&mut word)
        .map_err(|_| TrackError::InvalidArtifact("truncated point count".into()))?;
    let count = u32::from_le_bytes(word) as usize;
    let len = count
        .checked_mul(8)
        .ok_or_else(|| TrackError::InvalidArtifact(format!("point count {count} overflows")))?;
    // buffer only the bytes actually present
    let mut payload = Vec::new();
    reader
        .by_ref()
        .take(len as u64)
        .read_to_end(&mut payload)
        .map_err(|e| TrackError::InvalidArtifact(format!("read failed: {e}")))?;
    if payload.len() != len {
        return Err(TrackError::InvalidArtifact(format!(
            "truncated sequence, {count} point(s) announced but {} byte(s) present",
            payload.len()
        )));
    }
    Ok(payload
        .chunks_exact(8)
        .map(|c| {
            Point::new(
                f32::from_le_bytes([c[0], c[1], c[2], c[3]]),
                f32::from_le_bytes([c[4], c[5], c[6], c[7]]),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_little_endian() {
        let bytes = encode(&[&[Point::new(1.0, -2.5)]]).unwrap();
        assert_eq!(&bytes[..4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &(-2.5f32).to_le_bytes());
        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn empty_sequence_is_just_a_count() {
        let bytes = encode(&[&[], &[]]).unwrap();
        assert_eq!(bytes, vec![0u8; 8]);
        let decoded = decode(&bytes, Some(2)).unwrap();
        assert!(decoded.iter().all(|s| s.is_empty()));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let mut bytes = encode(&[&[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]]).unwrap();
        bytes.pop();
        assert!(matches!(decode(&bytes, None), Err(TrackError::InvalidArtifact(_))));
        assert!(decode(&bytes[..2], None).is_err());
    }

    #[test]
    fn sequence_count_is_enforced() {
        let bytes = encode(&[&[Point::new(1.0, 2.0)]]).unwrap();
        assert!(decode(&bytes, Some(2)).is_err());
        let two = encode(&[&[Point::new(1.0, 2.0)], &[Point::new(3.0, 4.0)]]).unwrap();
        assert!(decode(&two, Some(1)).is_err());
        assert_eq!(decode(&two, None).unwrap().len(), 2);
    }

    #[test]
    fn oversized_count_is_rejected_without_allocating() {
        let err = decode(&[0xff, 0xff, 0xff, 0xff, 1, 2, 3, 4], None).unwrap_err();
        assert!(matches!(err, TrackError::InvalidArtifact(_)), "{err}");
    }
}
