/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use fred::{
    interfaces::{KeysInterface, SetsInterface, SortedSetsInterface},
    types::{Expiration, SetOptions, ZSort},
};
use tracing::instrument;

use super::{error::RedisError, types::RedisConnectionPool};

impl RedisConnectionPool {
    // SET without expiry, for durable records
    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn set_key(&self, key: &str, value: &str) -> Result<(), RedisError> {
        self.pool
            .set(key, value, None, None, false)
            .await
            .map_err(|err| RedisError::SetFailed(err.to_string()))
    }

    // SET with expiry in seconds
    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry: u32,
    ) -> Result<(), RedisError> {
        self.pool
            .set(
                key,
                value,
                Some(Expiration::EX(expiry.into())),
                None,
                false,
            )
            .await
            .map_err(|err| RedisError::SetFailed(err.to_string()))
    }

    // SET NX, returns whether the key was actually set
    #[instrument(level = "DEBUG", skip(self, value))]
    pub async fn setnx(&self, key: &str, value: &str) -> Result<bool, RedisError> {
        let output: Option<String> = self
            .pool
            .set(key, value, None, Some(SetOptions::NX), false)
            .await
            .map_err(|err| RedisError::SetFailed(err.to_string()))?;

        Ok(output.is_some())
    }

    #[instrument(level = "DEBUG", skip(self))]
    pub async fn get_key(&self, key: &str) -> Result<Option<String>, RedisError> {
        self.pool
            .get(key)
            .await
            .map_err(|err| RedisError::GetFailed(err.to_string()))
    }

    #[instrument(level = "DEBUG", skip(self))]
    pub async fn delete_key(&self, key: &str) -> Result<(), RedisError> {
        self.pool
            .del(key)
            .await
            .map_err(|err| RedisError::DeleteFailed(err.to_string()))
    }

    //ZADD
    #[instrument(level = "DEBUG", skip(self, member))]
    pub async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<(), RedisError> {
        self.pool
            .zadd(key, None, None, false, false, vec![(score, member)])
            .await
            .map_err(|err| RedisError::ZAddFailed(err.to_string()))
    }

    //ZRANGE start stop REV, highest score first
    #[instrument(level = "DEBUG", skip(self))]
    pub async fn zrange_rev(
        &self,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Result<Vec<String>, RedisError> {
        self.pool
            .zrange(key, start, stop, None, true, None, false)
            .await
            .map_err(|err| RedisError::ZRangeFailed(err.to_string()))
    }

    //ZRANGE min max BYSCORE, lowest score first
    #[instrument(level = "DEBUG", skip(self))]
    pub async fn zrange_by_score(
        &self,
        key: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<String>, RedisError> {
        self.pool
            .zrange(key, min, max, Some(ZSort::ByScore), false, None, false)
            .await
            .map_err(|err| RedisError::ZRangeFailed(err.to_string()))
    }

    //ZRANGE max min BYSCORE REV, highest score first
    #[instrument(level = "DEBUG", skip(self))]
    pub async fn zrange_by_score_rev(
        &self,
        key: &str,
        max: f64,
        min: f64,
    ) -> Result<Vec<String>, RedisError> {
        self.pool
            .zrange(key, max, min, Some(ZSort::ByScore), true, None, false)
            .await
            .map_err(|err| RedisError::ZRangeFailed(err.to_string()))
    }

    //ZREM
    #[instrument(level = "DEBUG", skip(self, member))]
    pub async fn zrem(&self, key: &str, member: &str) -> Result<(), RedisError> {
        self.pool
            .zrem(key, member)
            .await
            .map_err(|err| RedisError::ZRemFailed(err.to_string()))
    }

    //SADD
    #[instrument(level = "DEBUG", skip(self, member))]
    pub async fn sadd(&self, key: &str, member: &str) -> Result<(), RedisError> {
        self.pool
            .sadd(key, member)
            .await
            .map_err(|err| RedisError::SAddFailed(err.to_string()))
    }

    //SMEMBERS
    #[instrument(level = "DEBUG", skip(self))]
    pub async fn smembers(&self, key: &str) -> Result<Vec<String>, RedisError> {
        self.pool
            .smembers(key)
            .await
            .map_err(|err| RedisError::SMembersFailed(err.to_string()))
    }

    //SREM
    #[instrument(level = "DEBUG", skip(self, member))]
    pub async fn srem(&self, key: &str, member: &str) -> Result<(), RedisError> {
        self.pool
            .srem(key, member)
            .await
            .map_err(|err| RedisError::SRemFailed(err.to_string()))
    }
}
