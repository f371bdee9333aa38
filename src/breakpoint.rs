// Breakpoint resolution: sorted max-extent thresholds mapped to target sizes.
// The smallest threshold that still contains the viewport wins; past every threshold the fallback applies.

use crate::error::ResponsiveError;
use crate::types::*;
use crate::viewport::MediaQuery;

/// One row of a breakpoint table: up to `max_extent` px, apply `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub max_extent: f64,
    pub size: f64,
}

/// Resolves a viewport extent to the size a target should take.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointResolver {
    dimension: Dimension,
    breakpoints: Vec<Breakpoint>,
    fallback: TargetSize,
}

impl BreakpointResolver {
    /// Build a resolver from an unordered table and the fallback size.
    ///
    /// The dimension is taken from the fallback, which must name exactly one of
    /// width or height. Thresholds must be finite and non-negative; they are
    /// sorted ascending here, once. If a threshold appears twice the later
    /// entry wins.
    pub fn new<I>(table: I, fallback: SizeSpec) -> Result<Self, ResponsiveError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let fallback = fallback.validate()?;
        let dimension = fallback.dimension();

        let mut entries: Vec<(f64, f64)> = table.into_iter().collect();
        if let Some((max_extent, _)) = entries
            .iter()
            .find(|(max_extent, _)| !max_extent.is_finite() || *max_extent < 0.0)
        {
            return Err(ResponsiveError::InvalidConfiguration(format!(
                "breakpoint {}px must be a non-negative finite number",
                max_extent
            )));
        }
        // Stable, so equal thresholds keep insertion order.
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut breakpoints: Vec<Breakpoint> = Vec::with_capacity(entries.len());
        for (max_extent, size) in entries {
            if !size.is_finite() {
                return Err(ResponsiveError::InvalidConfiguration(format!(
                    "size for breakpoint {}px must be a finite number",
                    max_extent
                )));
            }
            match breakpoints.last_mut() {
                Some(last) if last.max_extent == max_extent => last.size = size,
                _ => breakpoints.push(Breakpoint { max_extent, size }),
            }
        }

        log::debug!(
            "resolver on {} with {} breakpoint(s), fallback {}",
            dimension.as_str(),
            breakpoints.len(),
            fallback.value()
        );

        Ok(BreakpointResolver {
            dimension,
            breakpoints,
            fallback,
        })
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn fallback(&self) -> TargetSize {
        self.fallback
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Thresholds in ascending order.
    pub fn thresholds(&self) -> Vec<f64> {
        self.breakpoints.iter().map(|bp| bp.max_extent).collect()
    }

    /// One media query per breakpoint, ascending.
    pub fn queries(&self) -> Vec<MediaQuery> {
        self.breakpoints
            .iter()
            .map(|bp| MediaQuery::new(self.dimension, bp.max_extent))
            .collect()
    }

    /// Size for a given viewport extent along the resolver's dimension.
    pub fn resolve(&self, extent: f64) -> TargetSize {
        // Sorted ascending, so the first threshold at or above the extent is the smallest one.
        let index = self.breakpoints.partition_point(|bp| bp.max_extent < extent);
        self.size_at(index)
    }

    /// Size for the first true query state, ascending. Fallback when none is true.
    ///
    /// `states[i]` is the state of the query for the i-th breakpoint.
    pub fn first_match(&self, states: &[bool]) -> TargetSize {
        let index = states
            .iter()
            .take(self.breakpoints.len())
            .position(|matches| *matches)
            .unwrap_or(self.breakpoints.len());
        self.size_at(index)
    }

    /// Size applied when the query for breakpoint `index` flips to `matches`.
    ///
    /// Becoming true applies that breakpoint's size. Becoming false promotes to
    /// the next larger breakpoint, or to the fallback past the last one. When one
    /// change flips several queries, the last transition applied must be the
    /// smallest query becoming true or the largest becoming false.
    pub fn on_transition(&self, index: usize, matches: bool) -> TargetSize {
        if matches {
            self.size_at(index)
        } else {
            self.size_at(index + 1)
        }
    }

    fn size_at(&self, index: usize) -> TargetSize {
        match self.breakpoints.get(index) {
            Some(bp) => TargetSize::new(self.dimension, bp.size),
            None => self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card_resolver() -> BreakpointResolver {
        BreakpointResolver::new(
            vec![(700.0, 250.0), (500.0, 100.0), (800.0, 300.0), (600.0, 200.0)],
            SizeSpec::width(400.0),
        )
        .expect("valid resolver")
    }

    #[test]
    fn sorts_thresholds_ascending() {
        let resolver = card_resolver();
        assert_eq!(resolver.thresholds(), vec![500.0, 600.0, 700.0, 800.0]);
        assert_eq!(resolver.dimension(), Dimension::Width);
    }

    #[test]
    fn resolves_card_scenario() {
        let resolver = card_resolver();
        assert_eq!(resolver.resolve(450.0), TargetSize::Width(100.0));
        assert_eq!(resolver.resolve(650.0), TargetSize::Width(250.0));
        assert_eq!(resolver.resolve(900.0), TargetSize::Width(400.0));
    }

    #[test]
    fn threshold_is_inclusive() {
        let resolver = card_resolver();
        assert_eq!(resolver.resolve(500.0), TargetSize::Width(100.0));
        assert_eq!(resolver.resolve(501.0), TargetSize::Width(200.0));
        assert_eq!(resolver.resolve(800.0), TargetSize::Width(300.0));
        assert_eq!(resolver.resolve(801.0), TargetSize::Width(400.0));
    }

    #[test]
    fn fractional_threshold() {
        let resolver =
            BreakpointResolver::new(vec![(500.5, 100.0)], SizeSpec::width(400.0)).unwrap();
        assert_eq!(resolver.resolve(500.0), TargetSize::Width(100.0));
        assert_eq!(resolver.resolve(501.0), TargetSize::Width(400.0));
        assert_eq!(resolver.queries()[0].to_css(), "(max-width: 500.5px)");
    }

    #[test]
    fn rejects_negative_or_non_finite_threshold() {
        for threshold in [-5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                BreakpointResolver::new(vec![(threshold, 100.0)], SizeSpec::width(400.0)),
                Err(ResponsiveError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn empty_table_always_falls_back() {
        let resolver =
            BreakpointResolver::new(Vec::new(), SizeSpec::height(300.0)).expect("valid resolver");
        for extent in [0.0, 1.0, 500.0, u32::MAX as f64] {
            assert_eq!(resolver.resolve(extent), TargetSize::Height(300.0));
        }
        assert_eq!(resolver.first_match(&[]), TargetSize::Height(300.0));
        assert!(resolver.queries().is_empty());
    }

    #[test]
    fn duplicate_threshold_keeps_last() {
        let resolver = BreakpointResolver::new(
            vec![(500.0, 100.0), (500.0, 120.0)],
            SizeSpec::width(400.0),
        )
        .expect("valid resolver");
        assert_eq!(resolver.breakpoints().len(), 1);
        assert_eq!(resolver.resolve(300.0), TargetSize::Width(120.0));
    }

    #[test]
    fn rejects_ambiguous_fallback() {
        let both = SizeSpec {
            width: Some(400.0),
            height: Some(600.0),
        };
        assert!(matches!(
            BreakpointResolver::new(vec![(500.0, 100.0)], both),
            Err(ResponsiveError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            BreakpointResolver::new(vec![(500.0, 100.0)], SizeSpec::default()),
            Err(ResponsiveError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn rejects_non_finite_table_value() {
        let result = BreakpointResolver::new(vec![(500.0, f64::NAN)], SizeSpec::width(400.0));
        assert!(result.is_err());
    }

    #[test]
    fn first_match_picks_smallest_true() {
        let resolver = card_resolver();
        assert_eq!(
            resolver.first_match(&[false, true, true, true]),
            TargetSize::Width(200.0)
        );
        assert_eq!(
            resolver.first_match(&[false, false, false, false]),
            TargetSize::Width(400.0)
        );
    }

    #[test]
    fn transition_promotes_to_next_breakpoint() {
        let resolver = card_resolver();
        assert_eq!(resolver.on_transition(1, true), TargetSize::Width(200.0));
        assert_eq!(resolver.on_transition(1, false), TargetSize::Width(250.0));
        assert_eq!(resolver.on_transition(3, false), TargetSize::Width(400.0));
        assert_eq!(resolver.fallback(), TargetSize::Width(400.0));
    }

    #[test]
    fn queries_follow_dimension() {
        let resolver =
            BreakpointResolver::new(vec![(900.0, 500.0)], SizeSpec::height(700.0)).unwrap();
        let queries = resolver.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].to_css(), "(max-height: 900px)");
    }

    mod property_tests {
        use super::*;

        fn table_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
            prop::collection::vec((0u32..2_000, 1.0f64..1_000.0), 0..8).prop_map(|table| {
                table
                    .into_iter()
                    .map(|(bp, size)| (bp as f64, size))
                    .collect()
            })
        }

        proptest! {
            /// The resolved size is the one mapped to the smallest threshold >= extent,
            /// or the fallback when no threshold is that large.
            #[test]
            fn resolves_smallest_containing_threshold(
                table in table_strategy(),
                extent in 0u32..2_500,
            ) {
                let resolver = BreakpointResolver::new(table.clone(), SizeSpec::width(4_000.0)).unwrap();
                let extent = extent as f64;

                let expected = table
                    .iter()
                    .filter(|(bp, _)| extent <= *bp)
                    .map(|(bp, _)| *bp)
                    .min_by(f64::total_cmp)
                    .map(|bp| {
                        // Later duplicates win.
                        let size = table.iter().rev().find(|(k, _)| *k == bp).map(|(_, s)| *s).unwrap();
                        TargetSize::Width(size)
                    })
                    .unwrap_or(TargetSize::Width(4_000.0));

                prop_assert_eq!(resolver.resolve(extent), expected);
            }

            /// Feeding the query states for an extent into `first_match` agrees with `resolve`.
            #[test]
            fn first_match_agrees_with_resolve(
                table in table_strategy(),
                extent in 0u32..2_500,
            ) {
                let resolver = BreakpointResolver::new(table, SizeSpec::height(900.0)).unwrap();
                let viewport = ViewportSize::new(0, extent);
                let states: Vec<bool> = resolver
                    .queries()
                    .iter()
                    .map(|q| q.matches(&viewport))
                    .collect();

                prop_assert_eq!(resolver.first_match(&states), resolver.resolve(extent as f64));
            }

            #[test]
            fn thresholds_strictly_ascending(table in table_strategy()) {
                let resolver = BreakpointResolver::new(table, SizeSpec::width(1.0)).unwrap();
                let thresholds = resolver.thresholds();
                for pair in thresholds.windows(2) {
                    prop_assert!(pair[0] < pair[1]);
                }
            }
        }
    }
}
