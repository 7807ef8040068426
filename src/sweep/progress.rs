use kdam::{tqdm, Bar, BarExt};

/// Optional progress bar over the outputs of a round
pub(crate) struct Progress {
    bar: Option<Bar>,
}

impl Progress {
    pub fn new(enabled: bool, total: usize) -> Self {
        let bar = enabled.then(|| {
            let mut bar = tqdm!(total = total);
            bar.set_description("Outputs solved");
            bar
        });
        Progress { bar }
    }

    /// Report the number of outputs solved so far; display errors are ignored
    pub fn update(&mut self, nb_done: usize, nb_proved: usize, nb_cexes: usize) {
        if let Some(bar) = &mut self.bar {
            bar.set_postfix(format!("proved={nb_proved} cex={nb_cexes}"));
            let _ = bar.update_to(nb_done);
        }
    }
}
