use serde::Serialize;

/// Page size used when a listing request does not specify one.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Requested page window. Both values are 1-based and at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub per_page: usize,
    pub page: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl PageSpec {
    /// Build a page window, raising zero values to one.
    pub fn new(per_page: usize, page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            page: page.max(1),
        }
    }

    /// Fill in defaults for parameters the request left out.
    pub fn from_request(per_page: Option<usize>, page: Option<usize>) -> Self {
        Self::new(per_page.unwrap_or(DEFAULT_PER_PAGE), page.unwrap_or(1))
    }

    /// Index of the first item on the page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Pagination block returned next to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub total: usize,
    pub per_page: usize,
    pub current_page: usize,
    pub last_page: usize,
    /// 1-based index of the first item on the page.
    ///
    /// `0` when the page holds nothing, either because the collection is empty
    /// or because the requested page lies past `last_page`.
    pub from: usize,
    /// 1-based index of the last item on the page, `0` whenever `from` is.
    pub to: usize,
}

impl PaginationMeta {
    /// Describe page `spec` of a collection holding `total` items.
    pub fn new(total: usize, spec: PageSpec) -> Self {
        let last_page = total.div_ceil(spec.per_page).max(1);
        let start = spec.offset();

        let (from, to) = if start < total {
            (
                start + 1,
                spec.page.saturating_mul(spec.per_page).min(total),
            )
        } else {
            (0, 0)
        };

        Self {
            total,
            per_page: spec.per_page,
            current_page: spec.page,
            last_page,
            from,
            to,
        }
    }
}

/// One page of an ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    /// Wrap items that were already paginated by storage.
    pub fn new(data: Vec<T>, pagination: PaginationMeta) -> Self {
        Self { data, pagination }
    }
}

/// Slice a fully ordered collection into the requested page.
///
/// Out-of-range pages come back empty rather than failing.
pub fn paginate<T>(items: Vec<T>, spec: PageSpec) -> Page<T> {
    let pagination = PaginationMeta::new(items.len(), spec);

    let data = items
        .into_iter()
        .skip(spec.offset())
        .take(spec.per_page)
        .collect();

    Page { data, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_page_of_fifteen() {
        let page = paginate((1..=15).collect::<Vec<_>>(), PageSpec::new(5, 2));

        assert_eq!(page.data, vec![6, 7, 8, 9, 10]);
        assert_eq!(
            page.pagination,
            PaginationMeta {
                total: 15,
                per_page: 5,
                current_page: 2,
                last_page: 3,
                from: 6,
                to: 10,
            }
        );
    }

    #[test]
    fn partial_last_page() {
        let page = paginate((1..=12).collect::<Vec<_>>(), PageSpec::new(5, 3));

        assert_eq!(page.data, vec![11, 12]);
        assert_eq!(page.pagination.from, 11);
        assert_eq!(page.pagination.to, 12);
        assert_eq!(page.pagination.last_page, 3);
    }

    #[test]
    fn empty_collection() {
        let page = paginate(Vec::<i32>::new(), PageSpec::default());

        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.from, 0);
        assert_eq!(page.pagination.to, 0);
        assert_eq!(page.pagination.last_page, 1);
        assert_eq!(page.pagination.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let page = paginate((1..=15).collect::<Vec<_>>(), PageSpec::new(5, 9));

        assert!(page.data.is_empty());
        assert_eq!(page.pagination.current_page, 9);
        assert_eq!(page.pagination.last_page, 3);
        assert_eq!(page.pagination.from, 0);
        assert_eq!(page.pagination.to, 0);
    }

    #[test]
    fn unreachable_page_saturates() {
        let meta = PaginationMeta::new(3, PageSpec::new(100, usize::MAX));

        assert_eq!(meta.current_page, usize::MAX);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.from, 0);
        assert_eq!(meta.to, 0);
    }

    #[test]
    fn request_defaults_and_zero_values() {
        assert_eq!(PageSpec::from_request(None, None), PageSpec::new(10, 1));
        assert_eq!(PageSpec::new(0, 0), PageSpec::new(1, 1));
    }

    #[test]
    fn serializes_wire_field_names() {
        let meta = PaginationMeta::new(15, PageSpec::new(5, 2));

        let value = serde_json::to_value(meta).expect("serialize meta");

        assert_eq!(
            value,
            serde_json::json!({
                "total": 15,
                "per_page": 5,
                "current_page": 2,
                "last_page": 3,
                "from": 6,
                "to": 10
            })
        );
    }
}
