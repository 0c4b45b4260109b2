use crate::args::Args;

pub trait Merge<T> {
    type Output;

    #[must_use]
    fn merge(self, other: T) -> Self::Output;
}

/// Lays `other` over `self`: on a key collision the entry of `other` wins.
impl Merge<Args> for Args {
    type Output = Args;

    #[inline]
    fn merge(mut self, other: Args) -> Self::Output {
        self.entries.extend(other.entries);
        self
    }
}

impl Merge<&Args> for Args {
    type Output = Args;

    #[inline]
    fn merge(mut self, other: &Args) -> Self::Output {
        self.entries
            .extend(other.entries.iter().map(|(name, argument)| (name.clone(), argument.clone())));
        self
    }
}
