//! Runs independent variants on the rayon pool when the `parallel` feature
//! is enabled.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use types::Variant;

/// Run `f` once per variant. Results come back in `variants` order.
pub fn map_variants<F, R>(variants: &[Variant], f: F, force_sequential: bool) -> Vec<R>
where
    F: Fn(Variant) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if !force_sequential {
            return variants.par_iter().map(|&variant| f(variant)).collect();
        }
    }

    #[cfg(not(feature = "parallel"))]
    let _ = force_sequential;

    variants.iter().map(|&variant| f(variant)).collect()
}
