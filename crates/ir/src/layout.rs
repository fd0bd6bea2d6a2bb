use crate::{Type, WORD_SIZE};

/// Computes how many memory words a value of a given type occupies.
pub trait TypeLayout {
    fn total_words(&self, ty: &Type) -> usize;

    /// Size in bytes, or `None` if it does not fit in the address space.
    fn size_of(&self, ty: &Type) -> Option<usize> {
        self.total_words(ty).checked_mul(WORD_SIZE)
    }
}

/// Word-granular memory layout.
///
/// Every base type takes one word. Byte arrays take their payload rounded up
/// to whole words plus two header words, one of which holds the length.
/// Word counts saturate, so an oversized type is caught by `size_of`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordLayout;

impl TypeLayout for WordLayout {
    fn total_words(&self, ty: &Type) -> usize {
        match ty {
            Type::Base(_) => 1,
            Type::Bytes { max_len } | Type::String { max_len } => {
                max_len.div_ceil(WORD_SIZE).saturating_add(2)
            }
            Type::List { elem, len } => self.total_words(elem).saturating_mul(*len),
            Type::Tuple(elems) => elems
                .iter()
                .map(|elem| self.total_words(elem))
                .fold(0, usize::saturating_add),
            Type::Struct(s) => s
                .members
                .values()
                .map(|ty| self.total_words(ty))
                .fold(0, usize::saturating_add),
        }
    }
}

/// Rounds `n` up to the next multiple of the word size, or `None` on overflow.
pub fn ceil32(n: usize) -> Option<usize> {
    n.checked_next_multiple_of(WORD_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructData;

    #[test]
    fn ceil32_rounds_up() {
        assert_eq!(ceil32(0), Some(0));
        assert_eq!(ceil32(1), Some(32));
        assert_eq!(ceil32(32), Some(32));
        assert_eq!(ceil32(33), Some(64));
        assert_eq!(ceil32(usize::MAX - 31), Some(usize::MAX - 31));
        assert_eq!(ceil32(usize::MAX - 30), None);
    }

    #[test]
    fn word_counts() {
        let layout = WordLayout;
        assert_eq!(layout.total_words(&Type::int128()), 1);
        assert_eq!(layout.total_words(&Type::bytes(0)), 2);
        assert_eq!(layout.total_words(&Type::bytes(33)), 4);
        assert_eq!(layout.total_words(&Type::list(Type::uint256(), 5)), 5);
        assert_eq!(layout.size_of(&Type::Tuple(vec![])), Some(0));

        let s = StructData::new(
            "Pair",
            [
                ("a".to_string(), Type::bool()),
                ("b".to_string(), Type::list(Type::int128(), 2)),
            ],
        );
        assert_eq!(layout.total_words(&Type::Struct(s)), 3);
    }

    #[test]
    fn oversized_types_have_no_size() {
        let layout = WordLayout;
        assert_eq!(layout.size_of(&Type::bytes(usize::MAX)), None);
        assert_eq!(layout.total_words(&Type::bytes(usize::MAX)), usize::MAX / WORD_SIZE + 3);

        let nested = Type::list(Type::list(Type::int128(), usize::MAX), 2);
        assert_eq!(layout.total_words(&nested), usize::MAX);
        assert_eq!(layout.size_of(&nested), None);

        let tuple = Type::Tuple(vec![Type::bytes(usize::MAX), Type::bytes(usize::MAX)]);
        assert_eq!(layout.size_of(&tuple), None);
    }
}
