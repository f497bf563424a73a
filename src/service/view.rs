use crate::config::ViewConfig;
use crate::error::{FailureKind, FetchError};
use crate::models::InvoiceRecord;
use crate::service::fetcher::InvoiceSource;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use uuid::Uuid;

const MAX_VIEW_ID_LEN: usize = 64;

/// 一次查询的序号，用于识别过期响应
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// 已加载的发票
#[derive(Debug, Clone)]
pub struct LoadedInvoice {
    pub order_number: String,
    pub record: Arc<InvoiceRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// 最近一次失败的查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// 视图生命周期：idle -> loading -> {loaded | failed}
///
/// `Loading`/`Failed` 携带之前展示的发票，失败时原样保留。
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        ticket: Ticket,
        order_number: String,
        previous: Option<LoadedInvoice>,
    },
    Loaded(LoadedInvoice),
    Failed {
        order_number: String,
        failure: FetchFailure,
        previous: Option<LoadedInvoice>,
    },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    /// 当前应展示的发票
    pub fn displayed(&self) -> Option<&LoadedInvoice> {
        match self {
            ViewState::Idle => None,
            ViewState::Loaded(loaded) => Some(loaded),
            ViewState::Loading { previous, .. } | ViewState::Failed { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            ViewState::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    fn into_displayed(self) -> Option<LoadedInvoice> {
        match self {
            ViewState::Idle => None,
            ViewState::Loaded(loaded) => Some(loaded),
            ViewState::Loading { previous, .. } | ViewState::Failed { previous, .. } => previous,
        }
    }
}

/// 查询结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 输入为空，未发请求
    Ignored,
    Loaded,
    Failed(FailureKind),
    /// 响应已过期 (有更新的查询或视图已关闭)，丢弃
    Stale,
}

/// 单个视图实例的状态：输入框内容 + 生命周期状态
#[derive(Debug, Clone, Default)]
pub struct InvoiceView {
    input: String,
    state: ViewState,
}

impl InvoiceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// 进入 Loading，记住当前展示的发票
    pub fn begin(&mut self, order_number: &str, ticket: Ticket) {
        let previous = std::mem::take(&mut self.state).into_displayed();
        self.state = ViewState::Loading {
            ticket,
            order_number: order_number.to_string(),
            previous,
        };
    }

    /// 写入查询结果；只有当前正在等待的 ticket 才会生效
    pub fn settle(
        &mut self,
        ticket: Ticket,
        result: Result<InvoiceRecord, FetchError>,
    ) -> SearchOutcome {
        let (order_number, previous) = match std::mem::take(&mut self.state) {
            ViewState::Loading {
                ticket: current,
                order_number,
                previous,
            } if current == ticket => (order_number, previous),
            other => {
                self.state = other;
                return SearchOutcome::Stale;
            }
        };

        match result {
            Ok(record) => {
                self.state = ViewState::Loaded(LoadedInvoice {
                    order_number,
                    record: Arc::new(record),
                    fetched_at: Utc::now(),
                });
                SearchOutcome::Loaded
            }
            Err(e) => {
                let kind = e.kind();
                self.state = ViewState::Failed {
                    order_number,
                    failure: FetchFailure {
                        kind,
                        message: e.to_string(),
                    },
                    previous,
                };
                SearchOutcome::Failed(kind)
            }
        }
    }

    /// 请求被放弃 (任务被丢弃)：退出 Loading，恢复之前的发票
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if !self.is_waiting_on(ticket) {
            return false;
        }
        self.state = match std::mem::take(&mut self.state).into_displayed() {
            Some(loaded) => ViewState::Loaded(loaded),
            None => ViewState::Idle,
        };
        true
    }

    fn is_waiting_on(&self, ticket: Ticket) -> bool {
        matches!(&self.state, ViewState::Loading { ticket: current, .. } if *current == ticket)
    }
}

/// 注册表里的一个视图，附带最近访问时间
#[derive(Debug)]
struct ViewSlot {
    view: InvoiceView,
    touched: Instant,
}

impl ViewSlot {
    fn new() -> Self {
        Self {
            view: InvoiceView::new(),
            touched: Instant::now(),
        }
    }

    fn touch(&mut self) -> &mut InvoiceView {
        self.touched = Instant::now();
        &mut self.view
    }
}

/// 视图注册表：每个视图ID独占一份状态
///
/// 只有发起过查询的视图才会占用条目；空闲超时的视图由 `evict_idle` 回收。
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: DashMap<String, ViewSlot>,
    next_ticket: AtomicU64,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 视图当前状态的拷贝 (不存在时为空视图，且不创建条目)
    pub fn snapshot(&self, view_id: &str) -> InvoiceView {
        self.views
            .get_mut(view_id)
            .map(|mut slot| slot.touch().clone())
            .unwrap_or_default()
    }

    /// 关闭视图，丢弃其发票；之后到达的响应都视为过期
    pub fn close(&self, view_id: &str) -> bool {
        self.views.remove(view_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// 开始一次查询；订单号去空白后为空则不做任何事
    pub fn begin_search(self: &Arc<Self>, view_id: &str, input: &str) -> Option<PendingSearch> {
        let order_number = input.trim();
        if order_number.is_empty() {
            tracing::debug!("View {} ignored empty order number", view_id);
            return None;
        }

        let ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1);
        {
            let mut slot = self.views.entry(view_id.to_string()).or_insert_with(ViewSlot::new);
            let view = slot.touch();
            view.set_input(input);
            view.begin(order_number, ticket);
        }

        tracing::info!(
            "View {} searching order {} (ticket {})",
            view_id,
            order_number,
            ticket.value()
        );

        Some(PendingSearch {
            registry: Arc::clone(self),
            view_id: view_id.to_string(),
            order_number: order_number.to_string(),
            ticket,
            settled: false,
        })
    }

    /// 完整的一次查询：开始 -> 拉取 -> 写回
    pub async fn search(
        self: &Arc<Self>,
        view_id: &str,
        input: &str,
        source: &dyn InvoiceSource,
    ) -> SearchOutcome {
        let Some(pending) = self.begin_search(view_id, input) else {
            return SearchOutcome::Ignored;
        };

        let result = source.fetch(pending.order_number()).await;
        pending.settle(result)
    }

    /// 后台查询：视图立即进入 Loading，拉取在独立任务中完成后写回
    ///
    /// 输入为空时返回 `None`，不发请求。
    pub fn spawn_search(
        self: &Arc<Self>,
        view_id: &str,
        input: &str,
        source: Arc<dyn InvoiceSource>,
    ) -> Option<JoinHandle<SearchOutcome>> {
        let pending = self.begin_search(view_id, input)?;
        Some(tokio::spawn(async move {
            let result = source.fetch(pending.order_number()).await;
            pending.settle(result)
        }))
    }

    /// 回收超过 `ttl` 未被访问的视图 (Loading 中的除外)，返回回收数量
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let mut evicted = 0;
        self.views.retain(|_, slot| {
            let keep = slot.view.state().is_loading() || slot.touched.elapsed() < ttl;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// 定期回收空闲视图；注册表被释放后任务自动结束
    pub fn spawn_sweeper(self: &Arc<Self>, config: &ViewConfig) -> JoinHandle<()> {
        let registry = Arc::downgrade(self);
        let ttl = Duration::from_secs(config.idle_ttl_secs);
        let every = Duration::from_secs(config.sweep_interval_secs.max(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    break;
                };
                let evicted = registry.evict_idle(ttl);
                if evicted > 0 {
                    tracing::info!("Evicted {} idle views, {} remaining", evicted, registry.len());
                }
            }
        })
    }

    fn settle(
        &self,
        view_id: &str,
        ticket: Ticket,
        result: Result<InvoiceRecord, FetchError>,
    ) -> SearchOutcome {
        match self.views.get_mut(view_id) {
            Some(mut slot) => slot.touch().settle(ticket, result),
            None => SearchOutcome::Stale,
        }
    }

    // 放弃后回到 Idle 的视图没有任何内容，直接移除
    fn abandon(&self, view_id: &str, ticket: Ticket) -> bool {
        let abandoned = match self.views.get_mut(view_id) {
            Some(mut slot) => slot.view.abandon(ticket),
            None => false,
        };
        if abandoned {
            self.views
                .remove_if(view_id, |_, slot| matches!(slot.view.state(), ViewState::Idle));
        }
        abandoned
    }
}

/// 进行中的查询
///
/// 必须调用 `settle` 写回结果；未写回就被丢弃时自动退出 Loading。
#[derive(Debug)]
pub struct PendingSearch {
    registry: Arc<ViewRegistry>,
    view_id: String,
    order_number: String,
    ticket: Ticket,
    settled: bool,
}

impl PendingSearch {
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn settle(mut self, result: Result<InvoiceRecord, FetchError>) -> SearchOutcome {
        self.settled = true;
        let outcome = self.registry.settle(&self.view_id, self.ticket, result);
        match outcome {
            SearchOutcome::Loaded => {
                tracing::info!("View {} loaded order {}", self.view_id, self.order_number)
            }
            SearchOutcome::Failed(kind) => tracing::error!(
                "View {} failed to load order {}: {:?}",
                self.view_id,
                self.order_number,
                kind
            ),
            SearchOutcome::Stale => tracing::warn!(
                "View {} discarded stale response for order {} (ticket {})",
                self.view_id,
                self.order_number,
                self.ticket.value()
            ),
            SearchOutcome::Ignored => {}
        }
        outcome
    }
}

impl Drop for PendingSearch {
    fn drop(&mut self) {
        if !self.settled && self.registry.abandon(&self.view_id, self.ticket) {
            tracing::warn!(
                "View {} abandoned search for order {} (ticket {})",
                self.view_id,
                self.order_number,
                self.ticket.value()
            );
        }
    }
}

/// 新视图ID (随机，不可猜测)
pub fn mint_view_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// 校验客户端带来的视图ID：只接受字母数字、`-`、`_`
pub fn parse_view_id(raw: Option<&str>) -> Option<String> {
    let id = raw?.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_VIEW_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| id.to_string())
}
