use std::sync::Arc;

use shared::models::UserRole;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::models::UserCreate;
use crate::db::repository::{
    OrderRepository, ProductRepository, SurrealCounterStore, UserRepository,
};
use crate::orders::OrderService;
use crate::sequence::SequenceAllocator;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价克隆的句柄 (SurrealDB 连接、Arc)，axum 每个请求克隆一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | sequences | SequenceAllocator | 订单编号序列 |
/// | users / products | Repository | 数据访问 |
/// | orders | OrderService | 下单流程 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 序列分配器 (SurrealDB 计数器)
    pub sequences: SequenceAllocator,
    pub users: UserRepository,
    pub products: ProductRepository,
    pub orders: OrderService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 打开数据库 (config.database_path)
    /// 2. 构建 JWT 服务、序列分配器和各仓库
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_service = DbService::new(
            &config.database_path,
            &config.database_ns,
            &config.database_db,
        )
        .await
        .map_err(|e| ServerError::Database(e.message))?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Ok(Self::from_db(config.clone(), db_service.db, jwt_service))
    }

    /// 使用已打开的数据库构建状态 (测试使用)
    pub fn from_db(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        let store = Arc::new(SurrealCounterStore::new(db.clone()));
        let sequences = SequenceAllocator::new(store)
            .with_format(config.order_code.clone())
            .with_retry(config.sequence_retry);

        let users = UserRepository::new(db.clone());
        let products = ProductRepository::new(db.clone());
        let orders = OrderService::new(OrderRepository::new(db.clone()), sequences.clone());

        Self {
            config,
            db,
            jwt_service,
            sequences,
            users,
            products,
            orders,
        }
    }

    /// 创建或提升初始管理员 (ADMIN_EMAIL / ADMIN_PASSWORD)
    ///
    /// 两个变量都未设置时什么都不做。已存在的账号只会被提升为管理员，密码不变。
    pub async fn seed_admin(&self) -> Result<()> {
        let (Some(email), Some(password)) = (&self.config.admin_email, &self.config.admin_password)
        else {
            return Ok(());
        };

        let existing = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        match existing {
            Some(user) if user.role.is_admin() => {
                tracing::debug!(email = %user.email, "Admin account already present");
            }
            Some(user) => {
                self.users
                    .set_role(&user.id_string(), UserRole::Admin)
                    .await
                    .map_err(|e| ServerError::Database(e.to_string()))?;
                tracing::info!(email = %user.email, "Existing user promoted to admin");
            }
            None => {
                let user = self
                    .users
                    .create(UserCreate {
                        first_name: "Store".to_string(),
                        last_name: "Admin".to_string(),
                        email: email.clone(),
                        password: password.clone(),
                        phone: None,
                        role: UserRole::Admin,
                    })
                    .await
                    .map_err(|e| ServerError::Database(e.to_string()))?;
                tracing::info!(email = %user.email, "Admin account created");
            }
        }
        Ok(())
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
