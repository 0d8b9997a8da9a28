//! Small nom grammars shared by the line-oriented codecs.
use std::str::FromStr;

use nom::{
    bytes::complete::tag,
    character::complete::{digit1, space0},
    combinator::{opt, recognize},
    number::complete::float,
    sequence::{pair, preceded, tuple},
    IResult,
};

fn spaced_float(input: &str) -> IResult<&str, f32> {
    preceded(space0, float)(input)
}

fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((spaced_float, spaced_float, spaced_float))(input)
}

/// Three whitespace-separated floats at the start of `input`.
///
/// Anything after the third value is ignored.
pub(crate) fn float_triple(input: &str) -> Option<[f32; 3]> {
    let (_, (x, y, z)) = vector3(input).ok()?;
    Some([x, y, z])
}

fn leading_keyword<'a>(input: &'a str, keyword: &str) -> IResult<&'a str, &'a str> {
    preceded(space0, tag(keyword))(input)
}

/// A keyword followed by three floats, e.g. `vertex 1 2 3`.
pub(crate) fn keyword_triple(input: &str, keyword: &str) -> Option<[f32; 3]> {
    let (rest, _) = leading_keyword(input, keyword).ok()?;
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    float_triple(rest)
}

fn signed_integer(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(tag("-")), digit1))(input)
}

/// Leading signed integer of a token such as `12/4/7` or `-3//2`.
pub(crate) fn leading_index(token: &str) -> Option<i64> {
    let (rest, digits) = signed_integer(token).ok()?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }
    digits.parse().ok()
}

/// Split `input` on commas and parse every token, skipping ones that fail.
pub(crate) fn comma_separated<'a, T: FromStr + 'a>(input: &'a str) -> impl Iterator<Item = T> + 'a {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_triple() {
        assert_eq!(float_triple("1 2.5 -3e1"), Some([1.0, 2.5, -30.0]));
        assert_eq!(float_triple("  0.1\t0.2 0.3 1.0"), Some([0.1, 0.2, 0.3]));
        assert_eq!(float_triple("1 2"), None);
        assert_eq!(float_triple("a b c"), None);
    }

    #[test]
    fn test_keyword_triple() {
        assert_eq!(keyword_triple("vertex 1 2 3", "vertex"), Some([1.0, 2.0, 3.0]));
        assert_eq!(keyword_triple("  vertex\t1 2 3", "vertex"), Some([1.0, 2.0, 3.0]));
        assert_eq!(keyword_triple("vertexx 1 2 3", "vertex"), None);
        assert_eq!(keyword_triple("normal 1 2 3", "vertex"), None);
    }

    #[test]
    fn test_leading_index() {
        assert_eq!(leading_index("12"), Some(12));
        assert_eq!(leading_index("-3"), Some(-3));
        assert_eq!(leading_index("7/1/2"), Some(7));
        assert_eq!(leading_index("7//2"), Some(7));
        assert_eq!(leading_index("x/1"), None);
        assert_eq!(leading_index("4a"), None);
    }

    #[test]
    fn test_comma_separated_skips_bad_tokens() {
        let values: Vec<f32> = comma_separated("1.5, 2,oops, ,-4").collect();
        assert_eq!(values, vec![1.5, 2.0, -4.0]);

        let values: Vec<i64> = comma_separated("0,1,-3,2.5").collect();
        assert_eq!(values, vec![0, 1, -3]);
    }
}
