use coinvault_core::db::open_db_in_memory;
use coinvault_core::{
    Coin, CoinId, CoinService, CoinStore, MoveError, SqliteCoinStore, StoreError, StoreResult,
};
use std::cell::RefCell;
use std::collections::HashMap;

fn raw_fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}

#[test]
fn move_relocates_the_record_between_collections() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());

    let mut coin = Coin::new();
    coin.name = "Morgan Dollar".to_string();
    coin.obverse_png = Some(vec![0x89, 0x50]);
    let store = SqliteCoinStore::try_new(&conn).unwrap();
    store
        .insert_coin("Owned", &coin, coin.obverse_png.as_deref(), None)
        .unwrap();

    service.move_coin("Owned", "Wishlist", &coin).unwrap();

    assert!(service.get_coin("Owned", coin.id).unwrap().is_none());
    let moved = service.get_coin("Wishlist", coin.id).unwrap().unwrap();
    assert_eq!(moved.id, coin.id);
    assert_eq!(moved.name, "Morgan Dollar");
    // Image bytes travel with the record.
    assert_eq!(moved.obverse_png.as_deref(), Some([0x89, 0x50].as_slice()));
}

#[test]
fn move_within_the_same_collection_fails_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());

    let mut coin = Coin::new();
    coin.name = "Peace Dollar".to_string();
    let id = {
        let store = SqliteCoinStore::try_new(&conn).unwrap();
        store.insert_coin("Owned", &coin, None, None).unwrap()
    };

    let err = service.move_coin("Owned", "Owned", &coin).unwrap_err();
    assert!(matches!(err, MoveError::SameCollection(_)));

    let remaining = service.list_coins("Owned").unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, id);
}

#[test]
fn move_with_empty_collection_names_fails_before_store_access() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());

    let coin = Coin::new();
    assert!(matches!(
        service.move_coin("", "Wishlist", &coin),
        Err(MoveError::EmptyCollectionName)
    ));
    assert!(matches!(
        service.move_coin("Owned", "   ", &coin),
        Err(MoveError::EmptyCollectionName)
    ));
}

#[test]
fn failed_insert_leaves_the_source_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());

    let mut coin = Coin::new();
    coin.name = "Trade Dollar".to_string();
    {
        let store = SqliteCoinStore::try_new(&conn).unwrap();
        store.insert_coin("Owned", &coin, None, None).unwrap();
    }

    // Target table was never created, so the insert half must fail.
    let err = service
        .move_coin("Owned", "no such list", &coin)
        .unwrap_err();
    assert!(matches!(err, MoveError::Store(_)));

    assert!(service.get_coin("Owned", coin.id).unwrap().is_some());
}

#[test]
fn move_is_atomic_on_the_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());

    let mut coin = Coin::new();
    coin.name = "Barber Quarter".to_string();
    {
        let store = SqliteCoinStore::try_new(&conn).unwrap();
        store.insert_coin("Owned", &coin, None, None).unwrap();
        // A duplicate identity already in the target makes the insert fail.
        store.insert_coin("Wishlist", &coin, None, None).unwrap();
    }

    let err = service.move_coin("Owned", "Wishlist", &coin).unwrap_err();
    assert!(matches!(err, MoveError::Store(_)));

    // The failed move rolled back wholesale: still exactly one copy on each
    // side.
    assert!(service.get_coin("Owned", coin.id).unwrap().is_some());
    assert_eq!(service.list_coins("Wishlist").unwrap().len(), 1);
}

#[test]
fn add_search_move_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());

    let names = service.collection_names().unwrap();
    assert!(names.iter().any(|name| name == "Owned"));
    assert!(names.iter().any(|name| name == "Wishlist"));

    let id = service
        .create_coin(
            "Owned",
            &raw_fields(&[
                ("name", "Morgan Dollar"),
                ("date", "1921"),
                ("grade", "AU"),
                ("diameter", "38.1"),
            ]),
        )
        .unwrap();

    let hits = service.search_coins("Owned", "date", "1921").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id);

    let coin = service.get_coin("Owned", id).unwrap().unwrap();
    service.move_coin("Owned", "Wishlist", &coin).unwrap();

    assert!(service.get_coin("Owned", id).unwrap().is_none());
    assert!(service.get_coin("Wishlist", id).unwrap().is_some());
}

/// In-memory store exercising the trait's default two-step relocate, with a
/// switch to make the delete half fail.
struct FlakyStore {
    collections: RefCell<HashMap<String, Vec<Coin>>>,
    fail_deletes: bool,
}

impl FlakyStore {
    fn new(fail_deletes: bool) -> Self {
        Self {
            collections: RefCell::new(HashMap::new()),
            fail_deletes,
        }
    }
}

impl CoinStore for FlakyStore {
    fn create_collection(&self, name: &str) -> StoreResult<()> {
        self.collections
            .borrow_mut()
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.collections.borrow().keys().cloned().collect())
    }

    fn delete_collection(&self, name: &str) -> StoreResult<()> {
        self.collections.borrow_mut().remove(name);
        Ok(())
    }

    fn insert_coin(
        &self,
        collection: &str,
        coin: &Coin,
        obverse: Option<&[u8]>,
        reverse: Option<&[u8]>,
    ) -> StoreResult<CoinId> {
        let mut map = self.collections.borrow_mut();
        let coins = map.get_mut(collection).ok_or_else(|| {
            StoreError::InvalidData(format!("unknown collection `{collection}`"))
        })?;
        let mut stored = coin.clone();
        stored.obverse_png = obverse.map(<[u8]>::to_vec);
        stored.reverse_png = reverse.map(<[u8]>::to_vec);
        coins.push(stored);
        Ok(coin.id)
    }

    fn update_coin(&self, collection: &str, coin: &Coin) -> StoreResult<usize> {
        let mut map = self.collections.borrow_mut();
        let Some(coins) = map.get_mut(collection) else {
            return Ok(0);
        };
        match coins.iter_mut().find(|stored| stored.id == coin.id) {
            Some(stored) => {
                let mut updated = coin.clone();
                updated.obverse_png = stored.obverse_png.take();
                updated.reverse_png = stored.reverse_png.take();
                *stored = updated;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_coin(&self, collection: &str, id: CoinId) -> StoreResult<usize> {
        if self.fail_deletes {
            return Err(StoreError::InvalidData(
                "simulated delete failure".to_string(),
            ));
        }
        let mut map = self.collections.borrow_mut();
        let Some(coins) = map.get_mut(collection) else {
            return Ok(0);
        };
        let before = coins.len();
        coins.retain(|stored| stored.id != id);
        Ok(before - coins.len())
    }

    fn get_coin(&self, collection: &str, id: CoinId) -> StoreResult<Option<Coin>> {
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .and_then(|coins| coins.iter().find(|stored| stored.id == id).cloned()))
    }

    fn list_coins(&self, collection: &str) -> StoreResult<Vec<Coin>> {
        Ok(self
            .collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }
}

#[test]
fn default_relocate_runs_insert_then_delete() {
    let store = FlakyStore::new(false);
    store.create_collection("Owned").unwrap();
    store.create_collection("Wishlist").unwrap();

    let mut coin = Coin::new();
    coin.name = "Standing Liberty".to_string();
    coin.obverse_png = Some(vec![0x01]);
    store
        .insert_coin("Owned", &coin, coin.obverse_png.as_deref(), None)
        .unwrap();

    store.relocate_coin("Owned", "Wishlist", &coin).unwrap();

    assert!(store.get_coin("Owned", coin.id).unwrap().is_none());
    let moved = store.get_coin("Wishlist", coin.id).unwrap().unwrap();
    assert_eq!(moved.obverse_png.as_deref(), Some([0x01].as_slice()));
}

#[test]
fn default_relocate_failed_insert_leaves_source_untouched() {
    let store = FlakyStore::new(false);
    store.create_collection("Owned").unwrap();

    let coin = Coin::new();
    store.insert_coin("Owned", &coin, None, None).unwrap();

    // Target was never created, so the insert half fails up front.
    let err = store
        .relocate_coin("Owned", "Wishlist", &coin)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(store.get_coin("Owned", coin.id).unwrap().is_some());
}

#[test]
fn default_relocate_surfaces_a_failed_delete_and_keeps_both_copies() {
    let store = FlakyStore::new(true);
    store.create_collection("Owned").unwrap();
    store.create_collection("Wishlist").unwrap();

    let coin = Coin::new();
    store.insert_coin("Owned", &coin, None, None).unwrap();

    // The insert half succeeds and the delete half fails, leaving the coin in
    // both collections; the failure reaches the caller instead of being
    // masked.
    let err = store
        .relocate_coin("Owned", "Wishlist", &coin)
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(store.get_coin("Owned", coin.id).unwrap().is_some());
    assert!(store.get_coin("Wishlist", coin.id).unwrap().is_some());
}

#[test]
fn startup_collection_prefers_a_known_last_opened_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CoinService::new(SqliteCoinStore::try_new(&conn).unwrap());
    service.create_collection("Ancients").unwrap();

    assert_eq!(
        service.startup_collection(Some("Ancients")).unwrap(),
        "Ancients"
    );
    assert_eq!(
        service.startup_collection(Some("long gone")).unwrap(),
        "Owned"
    );
    assert_eq!(service.startup_collection(None).unwrap(), "Owned");
}
