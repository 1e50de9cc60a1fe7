/// Amount of pages required to show `amount` items with `per_page` items each.
pub fn total_pages(amount: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }

    amount / per_page + (amount % per_page != 0) as usize
}

/// One-based page number of the page starting at `offset`.
pub fn page_number(offset: usize, per_page: usize) -> usize {
    offset / per_page.max(1) + 1
}
