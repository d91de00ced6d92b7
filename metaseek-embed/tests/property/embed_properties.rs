//! Property tests for the hashed-term provider: determinism, shape,
//! and normalization over arbitrary input text.

use proptest::prelude::*;

use metaseek_core::traits::IEmbeddingProvider;
use metaseek_embed::HashedTermProvider;

proptest! {
    #[test]
    fn embedding_is_deterministic(text in ".{0,80}") {
        let p = HashedTermProvider::default();
        prop_assert_eq!(p.embed(&text).unwrap(), p.embed(&text).unwrap());
    }

    #[test]
    fn embedding_has_the_declared_dimension(text in ".{0,80}", dims in 1usize..512) {
        let p = HashedTermProvider::new(dims);
        prop_assert_eq!(p.embed(&text).unwrap().len(), dims);
    }

    #[test]
    fn embedding_is_unit_norm_or_zero(text in ".{0,80}") {
        let p = HashedTermProvider::default();
        let v = p.embed(&text).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4, "norm {norm}");
    }

    #[test]
    fn case_and_surrounding_whitespace_are_irrelevant(word in "[a-zA-Z]{2,12}") {
        let p = HashedTermProvider::default();
        let canonical = p.embed(&word.to_lowercase()).unwrap();
        prop_assert_eq!(p.embed(&word.to_uppercase()).unwrap(), canonical.clone());
        prop_assert_eq!(p.embed(&format!("  {word}  ")).unwrap(), canonical);
    }
}
