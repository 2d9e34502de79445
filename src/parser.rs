use crate::error::SubreviewError;
use crate::srt::Subtitle;

use std::time::Duration;

use anyhow::{Context, Result};
use nom::bytes::complete::{tag, take_while1, take_while_m_n};
use nom::character::complete::{digit1, line_ending, multispace0, multispace1, space0, space1};
use nom::combinator::{all_consuming, map_res, opt};
use nom::error::{convert_error, ErrorKind, VerboseError};
use nom::multi::many_till;
use nom::sequence::terminated;
use nom::{branch::alt, error_position, Err, IResult};

pub fn parse(input: &str) -> Result<Vec<Subtitle>> {
    match srt_file(input) {
        Ok((_, subs)) => {
            log::debug!("Parsed {} subtitles", subs.len());
            Ok(subs)
        }
        Err(Err::Error(err)) | Err(Err::Failure(err)) => {
            let conv = convert_error(input, err);
            Err(SubreviewError::Parse(conv)).context("Failed to parse SRT file")
        }
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

/// Parses a single `HH:MM:SS,mmm` timestamp, as given on the command line.
pub fn parse_timestamp(input: &str) -> Result<Duration, SubreviewError> {
    let trimmed = input.trim();
    all_consuming(timestamp)(trimmed)
        .map(|(_, ts)| ts)
        .map_err(|_| SubreviewError::Timestamp(trimmed.to_string()))
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn srt_file(input: &str) -> IResult<&str, Vec<Subtitle>, VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, mut subs) = all_subtitles(input)?;
    let (input, _) = end_of_file(input)?;
    subs.sort_by_key(|s| s.show_at);
    Ok((input, subs))
}

fn all_subtitles(input: &str) -> IResult<&str, Vec<Subtitle>, VerboseError<&str>> {
    let mut parsed_subs = Vec::new();
    let mut input = input;
    loop {
        match subtitle(input) {
            Ok((rem_input, subtitle)) => {
                parsed_subs.push(subtitle);
                let (rem_input, _) = multispace0(rem_input)?;
                input = rem_input;
            }
            Err(err) => {
                let (rem_input, _) = multispace0(input)?;
                if rem_input.is_empty() {
                    return Ok((rem_input, parsed_subs));
                } else {
                    return Err(err);
                }
            }
        }
    }
}

fn subtitle(input: &str) -> IResult<&str, Subtitle, VerboseError<&str>> {
    let (input, _) = multispace0(input)?;
    // Sequence numbers are regenerated on output, so the parsed value is dropped.
    let (input, _) = terminated(seq_num, multispace1)(input)?;
    let (input, (show_at, hide_at)) = terminated(show_hide, line_ending)(input)?;
    let (input, text) = sub_text(input)?;

    Ok((input, Subtitle::new(show_at, hide_at, text)))
}

fn end_of_file(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

fn sub_text(input: &str) -> IResult<&str, Vec<String>, VerboseError<&str>> {
    let line = terminated(
        take_while1(|c: char| c != '\n' && c != '\r'),
        alt((line_ending, end_of_file)),
    );

    let (input, (vec, _)) = many_till(line, alt((line_ending, end_of_file)))(input)?;

    Ok((input, vec.into_iter().map(String::from).collect()))
}

fn show_hide(input: &str) -> IResult<&str, (Duration, Duration), VerboseError<&str>> {
    let (input, show_at) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, hide_at) = timestamp(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (show_at, hide_at)))
}

fn timestamp(input: &str) -> IResult<&str, Duration, VerboseError<&str>> {
    const MILLIS_MAX: usize = 3;
    const HOURS_MAX: usize = 6;
    const MS_MAX: usize = 2;

    // Short millisecond fields are right-padded (`,2` is 200ms), short
    // hour/minute/second fields are left-padded (`1:13:45` is `01:13:45`).
    let take_millis = || {
        map_res(
            take_while_m_n(0, MILLIS_MAX, |c: char| c.is_ascii_digit()),
            |s: &str| format!("{:0<3}", s).parse::<u64>(),
        )
    };
    let take_hms = |max: usize| {
        map_res(
            take_while_m_n(0, max, |c: char| c.is_ascii_digit()),
            |s: &str| format!("{:0>2}", s).parse::<u64>(),
        )
    };

    // Hours may run past two digits.
    let (input, hours) = take_hms(HOURS_MAX)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = take_hms(MS_MAX)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = take_hms(MS_MAX)(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = take_millis()(input)?;

    Ok((
        input,
        Duration::from_millis(
            millis + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

fn seq_num(input: &str) -> IResult<&str, usize, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_parse_ts {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let (_, duration) = timestamp(input).unwrap();

                assert_eq!(duration.as_millis(), expected);
            }
        )*
        }
    }

    test_parse_ts! {
        test_parse_ts_0: ("00:00:01,200", 1200),
        test_parse_ts_1: ("00:00:01,2", 1200),
        test_parse_ts_2: ("00:00:01,002", 1002),
        test_parse_ts_3: ("00:00:01,02", 1020),
        test_parse_ts_4: ("00:00:01,", 1000),
        test_parse_ts_5: ("1:1:1,200", 3661200),
        test_parse_ts_6: ("01:01:01,200", 3661200),
        test_parse_ts_7: ("100:00:00,001", 360_000_001),
        test_parse_ts_8: ("1234:00:00,000", 4_442_400_000),
    }

    #[test]
    fn rereads_serialised_long_timestamps() {
        let subs = vec![Subtitle::new(
            Duration::from_millis(360_000_001),
            Duration::from_millis(360_001_000),
            vec!["Late".to_string()],
        )];
        let mut out = Vec::new();
        crate::serialiser::serialise(&subs, &mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert_eq!(written, "1\n100:00:00,001 --> 100:00:01,000\nLate\n\n");

        assert_eq!(parse(&written).unwrap(), subs);
        assert_eq!(
            parse_timestamp("100:00:00,001").unwrap(),
            Duration::from_millis(360_000_001)
        );
    }

    #[test]
    fn whitespace_only_input_has_no_subtitles() {
        assert!(parse("\n\n").unwrap().is_empty());
        assert!(parse("\u{FEFF}\r\n  \r\n").unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn parses_and_sorts_file() {
        let input = "\u{FEFF}2\r\n00:00:05,000 --> 00:00:10,000\r\nSecond\r\n\r\n\
                     1\r\n00:00:00,000 --> 00:00:05,000\r\nFirst\r\nline two\r\n";

        let subs = parse(input).unwrap();

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].text, vec!["First", "line two"]);
        assert_eq!(subs[0].hide_at, Duration::from_secs(5));
        assert_eq!(subs[1].text, vec!["Second"]);
        assert_eq!(subs[1].show_at, Duration::from_secs(5));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse("1\nnot a timestamp\nText\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse SRT file"));
    }

    #[test]
    fn parses_cli_timestamp() {
        assert_eq!(
            parse_timestamp(" 00:01:02,5 ").unwrap(),
            Duration::from_millis(62_500)
        );
        assert!(matches!(
            parse_timestamp("00:01:02"),
            Err(SubreviewError::Timestamp(_))
        ));
        assert!(parse_timestamp("00:01:02,500 trailing").is_err());
    }
}
