/// 日志页每页条数
pub const PAGE_SIZE: usize = 10;

/// 客户端分页，页码从 1 开始
///
/// 页数至少为 1，空列表也显示 "第 1 页，共 1 页"。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// 当前页的切片；页码越界时为空
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1) * self.page_size;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }

    /// 已在最后一页时不动，返回是否翻页
    pub fn next(&mut self, len: usize) -> bool {
        if self.page < self.total_pages(len) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// 列表变短后把页码拉回有效范围
    pub fn clamp(&mut self, len: usize) {
        self.page = self.page.min(self.total_pages(len));
    }
}
