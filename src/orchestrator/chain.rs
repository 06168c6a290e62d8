//! Fallback chain construction

use super::types::Operation;
use crate::providers::ProviderKind;

/// Build the ordered provider chain for one call
///
/// Each operation has its own default order, always ending in the local
/// heuristic. A preferred provider is promoted to the front; the remaining
/// defaults keep their relative order with the duplicate removed.
pub(super) fn build_chain(
    operation: Operation,
    preferred: Option<ProviderKind>,
) -> Vec<ProviderKind> {
    let default_order: &[ProviderKind] = match operation {
        Operation::Explain => &[
            ProviderKind::OpenAi,
            ProviderKind::Claude,
            ProviderKind::Local,
        ],
        Operation::Summarize => &[
            ProviderKind::Claude,
            ProviderKind::OpenAi,
            ProviderKind::Local,
        ],
    };

    let mut chain = Vec::with_capacity(default_order.len());
    if let Some(kind) = preferred {
        chain.push(kind);
    }
    for kind in default_order {
        if !chain.contains(kind) {
            chain.push(*kind);
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orders_differ_per_operation() {
        assert_eq!(
            build_chain(Operation::Explain, None),
            vec![
                ProviderKind::OpenAi,
                ProviderKind::Claude,
                ProviderKind::Local
            ]
        );
        assert_eq!(
            build_chain(Operation::Summarize, None),
            vec![
                ProviderKind::Claude,
                ProviderKind::OpenAi,
                ProviderKind::Local
            ]
        );
    }

    #[test]
    fn preferred_is_promoted_and_deduplicated() {
        let chain = build_chain(Operation::Explain, Some(ProviderKind::Claude));
        assert_eq!(
            chain,
            vec![
                ProviderKind::Claude,
                ProviderKind::OpenAi,
                ProviderKind::Local
            ]
        );
    }

    #[test]
    fn preferring_the_default_head_changes_nothing() {
        let chain = build_chain(Operation::Explain, Some(ProviderKind::OpenAi));
        assert_eq!(chain, build_chain(Operation::Explain, None));
    }

    #[test]
    fn every_chain_contains_local_exactly_once() {
        for operation in [Operation::Explain, Operation::Summarize] {
            for preferred in [None, Some(ProviderKind::Local), Some(ProviderKind::Claude)] {
                let chain = build_chain(operation, preferred);
                let locals = chain
                    .iter()
                    .filter(|k| **k == ProviderKind::Local)
                    .count();
                assert_eq!(locals, 1, "{operation:?} {preferred:?}");
                // Every registered provider appears exactly once.
                assert_eq!(chain.len(), ProviderKind::ALL.len());
            }
        }
    }
}
