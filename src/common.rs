use std::fmt;

pub type StationId = usize;
pub type TrainId = usize;
pub type PackageId = usize;

pub type Weight = u32;
pub type Distance = u64;

#[derive(PartialEq, Copy, Clone, Default, Debug, Hash, Eq)]
pub enum Direction {
    #[default]
    Leftward,
    Rightward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Leftward => write!(f, "leftward"),
            Direction::Rightward => write!(f, "rightward"),
        }
    }
}

/// Splits a comma-delimited record into exactly `N` trimmed fields.
pub fn split_record<const N: usize>(record: &str) -> Option<[&str; N]> {
    let mut fields = [""; N];
    let mut parts = record.split(',').map(str::trim);
    for field in fields.iter_mut() {
        *field = parts.next()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(fields)
}
