use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::PreferenceAPI,
    auth::UserProfile,
    entities::SavedErrandsList,
    error::{invalid_input_error, Error},
};

fn validate_list(name: &str, errands: &[String]) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(invalid_input_error("list name must be non-empty"));
    }

    if errands.iter().any(|errand| errand.trim().is_empty()) {
        return Err(invalid_input_error("errands must be non-empty"));
    }

    Ok(())
}

#[async_trait]
impl PreferenceAPI for Engine {
    #[tracing::instrument(skip(self, user, errands), fields(uid = %user.uid))]
    async fn save_list(
        &self,
        user: &UserProfile,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error> {
        validate_list(&name, &errands)?;
        self.lists.save_list(&user.uid, name, errands).await
    }

    #[tracing::instrument(skip(self, user), fields(uid = %user.uid))]
    async fn list_lists(&self, user: &UserProfile) -> Result<Vec<SavedErrandsList>, Error> {
        self.lists.list_all(&user.uid).await
    }

    #[tracing::instrument(skip(self, user, errands), fields(uid = %user.uid))]
    async fn update_list(
        &self,
        user: &UserProfile,
        id: Uuid,
        name: String,
        errands: Vec<String>,
    ) -> Result<SavedErrandsList, Error> {
        validate_list(&name, &errands)?;
        self.lists.update_list(&user.uid, id, name, errands).await
    }

    #[tracing::instrument(skip(self, user), fields(uid = %user.uid))]
    async fn delete_list(&self, user: &UserProfile, id: Uuid) -> Result<(), Error> {
        self.lists.delete_list(&user.uid, id).await
    }

    async fn save_home_address(&self, address: String) -> bool {
        self.home.save_home_address(&address).await
    }

    async fn load_home_address(&self) -> String {
        self.home.load_home_address().await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{PreferenceAPI, SessionAPI};
    use crate::auth::Credentials;
    use crate::engine::test_support::*;
    use crate::error::ErrorKind;

    fn bypass() -> Credentials {
        Credentials {
            token: None,
            bypass: true,
        }
    }

    #[tokio::test]
    async fn lists_are_scoped_to_the_bypass_user() {
        let test = engine(vec![], "http://localhost:5173/?bypass=mellon").await;
        let user = test.engine.current_user(&bypass()).await.unwrap();

        let saved = test
            .engine
            .save_list(&user, "Weekend".into(), vec!["Hardware store".into()])
            .await
            .unwrap();
        let lists = test.engine.list_lists(&user).await.unwrap();

        assert_eq!(user.uid, "bypass-mellon");
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, saved.id);
    }

    #[tokio::test]
    async fn blank_list_name_is_invalid_input() {
        let test = engine(vec![], "http://localhost:5173/?bypass=mellon").await;
        let user = test.engine.current_user(&bypass()).await.unwrap();

        let err = test
            .engine
            .save_list(&user, " ".into(), vec![])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn home_address_round_trips() {
        let test = engine(vec![], "http://localhost:5173/").await;

        assert_eq!(test.engine.load_home_address().await, "");
        assert!(test.engine.save_home_address("1 Penn Sq".into()).await);
        assert_eq!(test.engine.load_home_address().await, "1 Penn Sq");
    }
}
