//! Embedded PNG container detection.
//!
//! Save files often carry a screenshot thumbnail. Its compressed pixel data
//! produces spurious matches, so each embedded PNG is excluded from the
//! signature up to the end of its `IEND` chunk.

use memchr::memmem;

use super::Region;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const CHUNK_HEADER_LEN: usize = 8;
const CHUNK_CRC_LEN: usize = 4;
const IEND: &[u8; 4] = b"IEND";

/// Find every embedded PNG container in `blob`.
///
/// Each chunk is `length (u32 BE) | type | data | crc`. CRCs are not
/// checked. A truncated or malformed container extends to the end of the
/// blob. The search resumes at `max(start + 1, end)`, so a malformed match
/// always makes progress.
pub fn find_png_regions(blob: &[u8]) -> Vec<Region> {
    let finder = memmem::Finder::new(&PNG_SIGNATURE);
    let mut regions = Vec::new();
    let mut search_from = 0;

    while search_from < blob.len() {
        let Some(rel) = finder.find(&blob[search_from..]) else {
            break;
        };
        let start = search_from + rel;
        let end = walk_chunks(blob, start + PNG_SIGNATURE.len());

        regions.push(Region::new(start, end, "png"));
        search_from = end.max(start + 1);
    }

    regions
}

/// Walk chunks from `cursor` and return the container end.
fn walk_chunks(blob: &[u8], mut cursor: usize) -> usize {
    while cursor + CHUNK_HEADER_LEN <= blob.len() {
        let length = u32::from_be_bytes([
            blob[cursor],
            blob[cursor + 1],
            blob[cursor + 2],
            blob[cursor + 3],
        ]) as usize;
        let chunk_type = &blob[cursor + 4..cursor + CHUNK_HEADER_LEN];

        let crc_end = match (cursor + CHUNK_HEADER_LEN)
            .checked_add(length)
            .and_then(|data_end| data_end.checked_add(CHUNK_CRC_LEN))
        {
            Some(end) if end <= blob.len() => end,
            _ => return blob.len(),
        };

        cursor = crc_end;
        if chunk_type == IEND {
            return cursor;
        }
    }

    blob.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        out.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        out
    }

    fn png(payload: &[u8]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(chunk(b"IHDR", &[0u8; 13]));
        out.extend(chunk(b"IDAT", payload));
        out.extend(chunk(b"IEND", &[]));
        out
    }

    #[test]
    fn test_well_formed_png() {
        let image = png(&[7u8; 40]);
        let mut blob = vec![0x11u8; 100];
        blob.extend_from_slice(&image);
        blob.extend_from_slice(&[0x22u8; 50]);

        let regions = find_png_regions(&blob);
        assert_eq!(regions, vec![Region::new(100, 100 + image.len(), "png")]);
    }

    #[test]
    fn test_two_pngs() {
        let image = png(&[1, 2, 3]);
        let mut blob = image.clone();
        blob.extend_from_slice(&[0u8; 10]);
        blob.extend_from_slice(&image);

        let regions = find_png_regions(&blob);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].end, image.len());
        assert_eq!(regions[1].start, image.len() + 10);
        assert_eq!(regions[1].end, blob.len());
    }

    #[test]
    fn test_truncated_png_runs_to_end() {
        let mut blob = vec![0u8; 16];
        blob.extend_from_slice(&PNG_SIGNATURE);
        blob.extend(chunk(b"IHDR", &[0u8; 13]));
        // IDAT claims far more data than remains
        blob.extend_from_slice(&0x00FF_FFFFu32.to_be_bytes());
        blob.extend_from_slice(b"IDAT");
        blob.extend_from_slice(&[0u8; 20]);

        let regions = find_png_regions(&blob);
        assert_eq!(regions, vec![Region::new(16, blob.len(), "png")]);
    }

    #[test]
    fn test_impossible_length_does_not_overflow() {
        let mut blob = PNG_SIGNATURE.to_vec();
        blob.extend_from_slice(&u32::MAX.to_be_bytes());
        blob.extend_from_slice(b"IDAT");

        let regions = find_png_regions(&blob);
        assert_eq!(regions, vec![Region::new(0, blob.len(), "png")]);
    }

    #[test]
    fn test_signature_at_blob_end() {
        let mut blob = vec![0u8; 4];
        blob.extend_from_slice(&PNG_SIGNATURE);
        let regions = find_png_regions(&blob);
        assert_eq!(regions, vec![Region::new(4, 12, "png")]);
    }

    #[test]
    fn test_no_png() {
        assert!(find_png_regions(&[0u8; 256]).is_empty());
        assert!(find_png_regions(&[]).is_empty());
    }
}
