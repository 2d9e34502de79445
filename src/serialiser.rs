use crate::srt::Subtitle;

use std::io::{BufWriter, Write};
use std::time::Duration;

use anyhow::{Context, Result};

/// Writes `subs` as SRT, numbering them from 1 in order.
pub fn serialise<'a, W, I>(subs: I, output: W) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Subtitle>,
{
    let mut writer = BufWriter::new(output);
    write_subs(&mut writer, subs).context("Failed to write subtitles.")?;
    writer.flush().context("Failed to write subtitles.")?;
    Ok(())
}

fn write_subs<'a, W, I>(buf: &mut W, subs: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Subtitle>,
{
    for (seqnum, sub) in (1..).zip(subs) {
        write_sub(buf, seqnum, sub)?;
    }
    Ok(())
}

fn write_sub<W: Write>(buf: &mut W, seqnum: usize, sub: &Subtitle) -> Result<()> {
    writeln!(buf, "{}", seqnum)?;
    write_ts(buf, sub.show_at)?;
    write!(buf, " --> ")?;
    write_ts(buf, sub.hide_at)?;
    writeln!(buf)?;
    for line in &sub.text {
        writeln!(buf, "{}", line)?;
    }
    writeln!(buf)?;
    Ok(())
}

pub fn write_ts<W: Write>(buf: &mut W, timestamp: Duration) -> Result<()> {
    write!(buf, "{}", format_ts(timestamp))?;
    Ok(())
}

pub fn format_ts(timestamp: Duration) -> String {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.as_millis() % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
