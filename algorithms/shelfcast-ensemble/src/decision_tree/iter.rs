use super::TreeNode;

/// Depth-first iterator over the nodes of a regression tree, starting at the root
pub struct NodeIter<'a, F> {
    queue: Vec<&'a TreeNode<F>>,
}

impl<'a, F> NodeIter<'a, F> {
    pub fn new(queue: Vec<&'a TreeNode<F>>) -> Self {
        NodeIter { queue }
    }
}

impl<'a, F: shelfcast::Float> Iterator for NodeIter<'a, F> {
    type Item = &'a TreeNode<F>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop().map(|node| {
            node.children()
                .into_iter()
                .filter_map(|x| x.as_deref())
                .for_each(|child| self.queue.push(child));

            node
        })
    }
}
