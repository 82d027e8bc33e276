use crate::error::{AssetError, AssetResult};

/// Raw 1-based indices of one face corner, as written in the file. Missing
/// texcoord/normal/color entries reuse the position index.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FaceCorner {
    pub position: isize,
    pub texcoord: isize,
    pub normal: isize,
    pub color: isize,
}

pub fn parse_f32_component(raw: &str, line_number: usize, label: &str) -> AssetResult<f32> {
    raw.parse::<f32>().map_err(|error| {
        AssetError::malformed(line_number, format!("invalid {} '{}': {}", label, raw, error))
    })
}

/// Parses the first `N` floats of `args`, failing if fewer are present.
pub fn parse_components<const N: usize>(
    args: &[&str],
    line_number: usize,
    label: &str,
) -> AssetResult<[f32; N]> {
    if args.len() < N {
        return Err(AssetError::malformed(
            line_number,
            format!("{} requires {} components, found {}", label, N, args.len()),
        ));
    }

    let mut values = [0.0f32; N];
    for (value, raw) in values.iter_mut().zip(args) {
        *value = parse_f32_component(raw, line_number, label)?;
    }
    Ok(values)
}

pub fn parse_face_corner(token: &str, line_number: usize) -> AssetResult<FaceCorner> {
    let fields: Vec<&str> = token.split('/').collect();
    if fields.len() > 4 {
        return Err(AssetError::malformed(
            line_number,
            format!("invalid face corner '{}'", token),
        ));
    }

    if fields[0].is_empty() {
        return Err(AssetError::malformed(
            line_number,
            format!("missing position index in face corner '{}'", token),
        ));
    }
    let position = parse_index(fields[0], line_number)?;

    let optional = |slot: usize| -> AssetResult<isize> {
        match fields.get(slot) {
            Some(raw) if !raw.is_empty() => parse_index(raw, line_number),
            _ => Ok(position),
        }
    };

    Ok(FaceCorner {
        position,
        texcoord: optional(1)?,
        normal: optional(2)?,
        color: optional(3)?,
    })
}

fn parse_index(raw: &str, line_number: usize) -> AssetResult<isize> {
    raw.parse::<isize>().map_err(|error| {
        AssetError::malformed(line_number, format!("invalid index '{}': {}", raw, error))
    })
}

/// Maps a raw OBJ index onto a pool of `count` entries. Positive indices are
/// 1-based, negative ones count back from the end; zero and anything out of
/// range yield `None`.
pub fn resolve_index(raw: isize, count: usize) -> Option<usize> {
    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as isize + raw
    } else {
        return None;
    };

    if resolved < 0 || resolved as usize >= count {
        None
    } else {
        Some(resolved as usize)
    }
}

/// Text after the directive token, trimmed; `None` when nothing follows.
pub fn directive_remainder<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    line.strip_prefix(directive)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn directive_value<'a>(
    line: &'a str,
    directive: &str,
    line_number: usize,
) -> AssetResult<&'a str> {
    directive_remainder(line, directive).ok_or_else(|| {
        AssetError::malformed(
            line_number,
            format!("directive '{}' is missing a required value", directive),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::{FaceCorner, directive_value, parse_components, parse_face_corner, resolve_index};
    use crate::error::AssetError;

    #[test]
    fn missing_fields_reuse_position_index() {
        assert_eq!(
            parse_face_corner("7", 1).unwrap(),
            FaceCorner {
                position: 7,
                texcoord: 7,
                normal: 7,
                color: 7
            }
        );
        assert_eq!(
            parse_face_corner("3//5", 1).unwrap(),
            FaceCorner {
                position: 3,
                texcoord: 3,
                normal: 5,
                color: 3
            }
        );
        assert_eq!(parse_face_corner("1/2/3/4", 1).unwrap().color, 4);
    }

    #[test]
    fn malformed_corners_are_rejected() {
        assert!(matches!(
            parse_face_corner("x/1", 9),
            Err(AssetError::MalformedGeometry { line: 9, .. })
        ));
        assert!(parse_face_corner("/1", 1).is_err());
        assert!(parse_face_corner("1/2/3/4/5", 1).is_err());
    }

    #[test]
    fn index_resolution_is_lenient() {
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(3, 3), Some(2));
        assert_eq!(resolve_index(4, 3), None);
        assert_eq!(resolve_index(0, 3), None);
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(1, 0), None);
    }

    #[test]
    fn components_require_enough_values() {
        let parsed: [f32; 3] = parse_components(&["1", "2.5", "-3e1"], 1, "normal").unwrap();
        assert_eq!(parsed, [1.0, 2.5, -30.0]);

        let short: Result<[f32; 3], _> = parse_components(&["1", "2"], 4, "normal");
        assert!(matches!(short, Err(AssetError::MalformedGeometry { line: 4, .. })));

        let bad: Result<[f32; 2], _> = parse_components(&["1,5", "2"], 2, "texcoord");
        assert!(bad.is_err());
    }

    #[test]
    fn directive_value_takes_rest_of_line() {
        assert_eq!(
            directive_value("usemtl  Brushed Steel ", "usemtl", 1).unwrap(),
            "Brushed Steel"
        );
        assert!(directive_value("mtllib", "mtllib", 1).is_err());
    }
}
