use std::sync::Arc;

use crate::adapters::JobSourceAdapter;

/// Orders adapters for the fallback walk.
///
/// Official sources come first, then Commercial, Directory and Synthetic.
/// Adapters sharing a tier keep their registration order.
pub fn fallback_chain(
    adapters: &[Arc<dyn JobSourceAdapter>],
) -> Vec<Arc<dyn JobSourceAdapter>> {
    let mut ordered = adapters.to_vec();
    ordered.sort_by_key(|adapter| adapter.descriptor().tier);
    ordered
}

#[cfg(test)]
mod tests {
    use crate::adapters::{AdapterResult, SourcePage, SourceRequest};
    use crate::models::{SourceDescriptor, SourceId, SourceTier};

    use super::*;

    struct StubAdapter {
        descriptor: SourceDescriptor,
    }

    impl StubAdapter {
        fn new(id: SourceId, tier: SourceTier) -> Arc<dyn JobSourceAdapter> {
            Arc::new(Self {
                descriptor: SourceDescriptor {
                    id,
                    display_name: "stub",
                    tier,
                },
            })
        }
    }

    impl JobSourceAdapter for StubAdapter {
        fn descriptor(&self) -> &SourceDescriptor {
            &self.descriptor
        }

        fn search(&self, _request: &SourceRequest) -> AdapterResult<SourcePage> {
            Ok(SourcePage::default())
        }
    }

    fn ids(chain: &[Arc<dyn JobSourceAdapter>]) -> Vec<SourceId> {
        chain.iter().map(|adapter| adapter.descriptor().id).collect()
    }

    #[test]
    fn orders_by_tier() {
        let adapters = vec![
            StubAdapter::new(SourceId::Synthetic, SourceTier::Synthetic),
            StubAdapter::new(SourceId::EmployerDirectory, SourceTier::Directory),
            StubAdapter::new(SourceId::Adzuna, SourceTier::Commercial),
            StubAdapter::new(SourceId::JobBank, SourceTier::Official),
        ];

        assert_eq!(
            ids(&fallback_chain(&adapters)),
            vec![
                SourceId::JobBank,
                SourceId::Adzuna,
                SourceId::EmployerDirectory,
                SourceId::Synthetic,
            ]
        );
    }

    #[test]
    fn ties_keep_registration_order() {
        let adapters = vec![
            StubAdapter::new(SourceId::Synthetic, SourceTier::Commercial),
            StubAdapter::new(SourceId::JobBank, SourceTier::Official),
            StubAdapter::new(SourceId::Adzuna, SourceTier::Commercial),
        ];

        assert_eq!(
            ids(&fallback_chain(&adapters)),
            vec![SourceId::JobBank, SourceId::Synthetic, SourceId::Adzuna]
        );
    }

    #[test]
    fn empty_input_returns_an_empty_chain() {
        assert!(fallback_chain(&[]).is_empty());
    }
}
