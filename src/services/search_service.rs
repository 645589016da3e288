use crate::database::{Activity, Companies, Company, Repository};
use crate::services::expander::{self, ActivityTreeSource, ACTIVITY_TREE_DEPTH};
use crate::utils::error::ApiError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Data-access contract the finder queries against. Every method is a
/// single batched round trip; child lookups come in via the
/// [`ActivityTreeSource`] supertrait so the category expander shares the
/// same store.
#[async_trait]
pub trait CompanyStore: ActivityTreeSource {
    async fn activity_by_name(&self, name: &str) -> Result<Option<Activity>>;
    async fn company_id_by_name(&self, name: &str) -> Result<Option<i32>>;
    async fn company_ids_by_address(&self, address: &str) -> Result<Vec<i32>>;
    async fn company_ids_by_activities(&self, activity_ids: &[i32]) -> Result<Vec<i32>>;
    async fn company_ids_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: i32,
    ) -> Result<Vec<i32>>;
    async fn load_companies(&self, ids: &[i32]) -> Result<Vec<Company>>;
}

#[async_trait]
impl CompanyStore for Repository {
    async fn activity_by_name(&self, name: &str) -> Result<Option<Activity>> {
        Repository::activity_by_name(self, name).await
    }

    async fn company_id_by_name(&self, name: &str) -> Result<Option<i32>> {
        Repository::company_id_by_name(self, name).await
    }

    async fn company_ids_by_address(&self, address: &str) -> Result<Vec<i32>> {
        Repository::company_ids_by_address(self, address).await
    }

    async fn company_ids_by_activities(&self, activity_ids: &[i32]) -> Result<Vec<i32>> {
        Repository::company_ids_by_activities(self, activity_ids).await
    }

    async fn company_ids_within_radius(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: i32,
    ) -> Result<Vec<i32>> {
        Repository::company_ids_within_radius(self, latitude, longitude, radius_km).await
    }

    async fn load_companies(&self, ids: &[i32]) -> Result<Vec<Company>> {
        Repository::load_companies(self, ids).await
    }
}

/// The query engine behind the five company lookup operations. Stateless;
/// every call runs its own queries against the store and returns fully
/// assembled aggregates.
pub struct SearchService<S: CompanyStore = Repository> {
    store: Arc<S>,
}

impl<S: CompanyStore> SearchService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn find_by_id(&self, pk: i32) -> Result<Company, ApiError> {
        info!("Attempt find company by id: {}", pk);

        let mut companies = self
            .store
            .load_companies(&[pk])
            .await
            .map_err(storage_error)?;

        companies
            .pop()
            .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Company, ApiError> {
        info!("Attempt find company by name: {}", name);

        let id = self
            .store
            .company_id_by_name(name)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

        let mut companies = self
            .store
            .load_companies(&[id])
            .await
            .map_err(storage_error)?;

        companies
            .pop()
            .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))
    }

    /// Companies tagged with the named activity or any descendant category
    /// within the fixed depth bound.
    ///
    /// An unresolvable activity name is NotFound; a resolvable activity with
    /// zero matching companies returns an empty list. The other list
    /// operations treat zero matches as NotFound instead; the asymmetry is
    /// inherited behavior, kept deliberately.
    pub async fn find_by_activity(&self, activity: &str) -> Result<Companies, ApiError> {
        info!("Attempt find company by activity: {}", activity);

        let root = self
            .store
            .activity_by_name(activity)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| ApiError::NotFound("Company not found".to_string()))?;

        let expanded = expander::expand(self.store.as_ref(), root.id, ACTIVITY_TREE_DEPTH)
            .await
            .map_err(storage_error)?;

        let mut activity_ids: Vec<i32> = expanded.into_iter().collect();
        activity_ids.sort_unstable();

        let company_ids = self
            .store
            .company_ids_by_activities(&activity_ids)
            .await
            .map_err(storage_error)?;

        let companies = self
            .store
            .load_companies(&company_ids)
            .await
            .map_err(storage_error)?;

        Ok(Companies { companies })
    }

    pub async fn find_by_address(&self, address: &str) -> Result<Companies, ApiError> {
        info!("Attempt find companies by address: {}", address);

        let company_ids = self
            .store
            .company_ids_by_address(address)
            .await
            .map_err(storage_error)?;

        if company_ids.is_empty() {
            return Err(ApiError::NotFound("Company not found".to_string()));
        }

        let companies = self
            .store
            .load_companies(&company_ids)
            .await
            .map_err(storage_error)?;

        Ok(Companies { companies })
    }

    pub async fn find_by_geo(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: i32,
    ) -> Result<Companies, ApiError> {
        info!(
            "Attempt find companies by geo: ({}, {}) within {} km",
            latitude, longitude, radius_km
        );

        let company_ids = self
            .store
            .company_ids_within_radius(latitude, longitude, radius_km)
            .await
            .map_err(storage_error)?;

        if company_ids.is_empty() {
            return Err(ApiError::NotFound("Company not found".to_string()));
        }

        let companies = self
            .store
            .load_companies(&company_ids)
            .await
            .map_err(storage_error)?;

        Ok(Companies { companies })
    }
}

/// Single choke point for storage failures: log with context, surface an
/// opaque internal error. Raw sqlx errors never cross this boundary.
fn storage_error(err: anyhow::Error) -> ApiError {
    error!("Storage failure: {:#}", err);
    ApiError::Internal(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use mockall::mock;

    mock! {
        Store {}

        #[async_trait]
        impl ActivityTreeSource for Store {
            async fn child_activity_ids(&self, parent_ids: &[i32]) -> Result<Vec<i32>>;
        }

        #[async_trait]
        impl CompanyStore for Store {
            async fn activity_by_name(&self, name: &str) -> Result<Option<Activity>>;
            async fn company_id_by_name(&self, name: &str) -> Result<Option<i32>>;
            async fn company_ids_by_address(&self, address: &str) -> Result<Vec<i32>>;
            async fn company_ids_by_activities(&self, activity_ids: &[i32]) -> Result<Vec<i32>>;
            async fn company_ids_within_radius(
                &self,
                latitude: f64,
                longitude: f64,
                radius_km: i32,
            ) -> Result<Vec<i32>>;
            async fn load_companies(&self, ids: &[i32]) -> Result<Vec<Company>>;
        }
    }

    fn service(store: MockStore) -> SearchService<MockStore> {
        SearchService::new(Arc::new(store))
    }

    fn company_fixture(id: i32) -> Company {
        Company {
            id,
            name: "ООО Рога и Копыта".to_string(),
            address: "г. Москва, ул. Ленина 1".to_string(),
            phone_numbers: vec!["2-222-222".to_string(), "3-333-333".to_string()],
            latitude: 55.7558,
            longitude: 37.6173,
            activities: vec!["Мясная продукция".to_string()],
        }
    }

    #[tokio::test]
    async fn find_by_id_missing_is_not_found() {
        let mut store = MockStore::new();
        store
            .expect_load_companies()
            .withf(|ids: &[i32]| ids == [999_999])
            .times(1)
            .returning(|_| Ok(vec![]));

        let result = service(store).find_by_id(999_999).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_id_returns_eager_aggregate() {
        let mut store = MockStore::new();
        store
            .expect_load_companies()
            .withf(|ids: &[i32]| ids == [1])
            .returning(|_| Ok(vec![company_fixture(1)]));

        let company = service(store).find_by_id(1).await.unwrap();
        assert_eq!(company.id, 1);
        assert!(!company.address.is_empty());
        assert_eq!(company.phone_numbers.len(), 2);
        assert_eq!(company.activities, ["Мясная продукция"]);
    }

    #[tokio::test]
    async fn find_by_name_zero_matches_is_not_found() {
        let mut store = MockStore::new();
        store
            .expect_company_id_by_name()
            .withf(|name| name == "SomeAnotherCompany")
            .times(1)
            .returning(|_| Ok(None));
        store.expect_load_companies().never();

        let result = service(store).find_by_name("SomeAnotherCompany").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_name_substring_match_resolves_to_one_company() {
        let mut store = MockStore::new();
        store
            .expect_company_id_by_name()
            .withf(|name| name == "Рога")
            .returning(|_| Ok(Some(1)));
        store
            .expect_load_companies()
            .withf(|ids: &[i32]| ids == [1])
            .returning(|_| Ok(vec![company_fixture(1)]));

        let company = service(store).find_by_name("Рога").await.unwrap();
        assert_eq!(company.name, "ООО Рога и Копыта");
    }

    #[tokio::test]
    async fn find_by_address_zero_matches_is_not_found() {
        let mut store = MockStore::new();
        store
            .expect_company_ids_by_address()
            .returning(|_| Ok(vec![]));
        store.expect_load_companies().never();

        let result = service(store).find_by_address("ул. Несуществующая 1").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_geo_zero_matches_is_not_found() {
        let mut store = MockStore::new();
        store
            .expect_company_ids_within_radius()
            .returning(|_, _, _| Ok(vec![]));
        store.expect_load_companies().never();

        let result = service(store).find_by_geo(0.0, 0.0, 100).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_geo_returns_every_company_in_radius() {
        let mut store = MockStore::new();
        store
            .expect_company_ids_within_radius()
            .withf(|lat, long, radius| {
                (*lat - 59.934190).abs() < 1e-9
                    && (*long - 30.332707).abs() < 1e-9
                    && *radius == 1
            })
            .returning(|_, _, _| Ok(vec![3, 4, 5]));
        store
            .expect_load_companies()
            .withf(|ids: &[i32]| ids == [3, 4, 5])
            .returning(|_| {
                Ok(vec![
                    company_fixture(3),
                    company_fixture(4),
                    company_fixture(5),
                ])
            });

        let found = service(store)
            .find_by_geo(59.934190, 30.332707, 1)
            .await
            .unwrap();
        assert_eq!(found.companies.len(), 3);
    }

    #[tokio::test]
    async fn find_by_activity_unresolvable_name_is_not_found() {
        let mut store = MockStore::new();
        store
            .expect_activity_by_name()
            .withf(|name| name == "Страхование")
            .times(1)
            .returning(|_| Ok(None));
        store.expect_child_activity_ids().never();

        let result = service(store).find_by_activity("Страхование").await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_activity_without_companies_is_empty_success() {
        // Resolvable category, no tagged companies: empty list, not
        // NotFound. The list operations for address/geo do raise NotFound
        // on empty; this asymmetry is inherited behavior.
        let mut store = MockStore::new();
        store
            .expect_activity_by_name()
            .withf(|name| name == "Автомобили")
            .returning(|_| {
                Ok(Some(Activity {
                    id: 4,
                    name: "Автомобили".to_string(),
                    parent_id: None,
                }))
            });
        store
            .expect_child_activity_ids()
            .withf(|parents: &[i32]| parents == [4])
            .returning(|_| Ok(vec![]));
        store
            .expect_company_ids_by_activities()
            .withf(|ids: &[i32]| ids == [4])
            .returning(|_| Ok(vec![]));
        store
            .expect_load_companies()
            .withf(|ids: &[i32]| ids.is_empty())
            .returning(|_| Ok(vec![]));

        let found = service(store).find_by_activity("Автомобили").await.unwrap();
        assert!(found.companies.is_empty());
    }

    #[tokio::test]
    async fn find_by_activity_searches_the_expanded_category_set() {
        let mut store = MockStore::new();
        store
            .expect_activity_by_name()
            .returning(|_| {
                Ok(Some(Activity {
                    id: 1,
                    name: "Еда".to_string(),
                    parent_id: None,
                }))
            });
        store
            .expect_child_activity_ids()
            .withf(|parents: &[i32]| parents == [1])
            .returning(|_| Ok(vec![2, 3]));
        store
            .expect_child_activity_ids()
            .withf(|parents: &[i32]| parents == [2, 3])
            .returning(|_| Ok(vec![]));
        store
            .expect_company_ids_by_activities()
            .withf(|ids: &[i32]| ids == [1, 2, 3])
            .returning(|_| Ok(vec![1, 2]));
        store
            .expect_load_companies()
            .withf(|ids: &[i32]| ids == [1, 2])
            .returning(|_| Ok(vec![company_fixture(1), company_fixture(2)]));

        let found = service(store).find_by_activity("Еда").await.unwrap();
        assert_eq!(found.companies.len(), 2);
    }

    #[tokio::test]
    async fn storage_failures_surface_as_internal() {
        let mut store = MockStore::new();
        store
            .expect_company_id_by_name()
            .returning(|_| Err(anyhow!("connection pool timed out")));

        let result = service(store).find_by_name("Рога").await;
        assert!(matches!(result, Err(ApiError::Internal(_))));
    }
}
