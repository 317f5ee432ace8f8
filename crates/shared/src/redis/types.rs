/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use fred::{interfaces::ClientLike, prelude::RedisPool, types::ConnectHandle};
use serde::Deserialize;

use super::error::RedisError;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub pool_size: usize,
    pub partition: usize,
    pub reconnect_max_attempts: u32,
    /// Reconnect delay in milliseconds
    pub reconnect_delay: u32,
    /// TTL in seconds
    pub default_ttl: u32,
}

impl Default for RedisSettings {
    fn default() -> Self {
        RedisSettings {
            host: String::from("localhost"),
            port: 6379,
            pool_size: 10,
            partition: 0,
            reconnect_max_attempts: 5,
            reconnect_delay: 1000,
            default_ttl: 3600,
        }
    }
}

impl RedisSettings {
    pub fn new(
        host: String,
        port: u16,
        pool_size: usize,
        partition: usize,
        reconnect_max_attempts: u32,
        reconnect_delay: u32,
        default_ttl: u32,
    ) -> Self {
        RedisSettings {
            host,
            port,
            pool_size,
            partition,
            reconnect_max_attempts,
            reconnect_delay,
            default_ttl,
        }
    }
}

pub struct RedisConnectionPool {
    pub pool: RedisPool,
    pub default_ttl: u32,
    _join_handle: ConnectHandle,
}

impl RedisConnectionPool {
    /// Create a new Redis connection pool and wait for the first successful
    /// connection before returning.
    pub async fn new(conf: RedisSettings) -> Result<Self, RedisError> {
        let redis_connection_url = format!(
            "redis://{}:{}/{}", //URI Schema
            conf.host, conf.port, conf.partition
        );

        let mut config = fred::types::RedisConfig::from_url(&redis_connection_url)
            .map_err(|err| RedisError::ConnectionError(err.to_string()))?;
        config.version = fred::types::RespVersion::RESP3;
        config.tracing = fred::types::TracingConfig::new(true);
        config.blocking = fred::types::Blocking::Error;

        let reconnect_policy = fred::types::ReconnectPolicy::new_constant(
            conf.reconnect_max_attempts,
            conf.reconnect_delay,
        );

        let pool = RedisPool::new(config, None, None, Some(reconnect_policy), conf.pool_size)
            .map_err(|err| RedisError::ConnectionError(err.to_string()))?;

        let join_handle = pool.connect();
        pool.wait_for_connect()
            .await
            .map_err(|err| RedisError::ConnectionError(err.to_string()))?;

        Ok(Self {
            pool,
            default_ttl: conf.default_ttl,
            _join_handle: join_handle,
        })
    }
}
