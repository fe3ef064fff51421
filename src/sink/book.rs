//! Names and binnings of every metric emitted for a detector region

use crate::record::Side;
use crate::region::CellAxes;

/// `bins` equal-width bins covering `[min, max)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binning {
    pub bins: usize,
    pub min: f64,
    pub max: f64,
}

impl Binning {
    pub const fn new(bins: usize, min: f64, max: f64) -> Self { Self { bins, min, max } }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    H1(Binning),
    H2(Binning, Binning),
    Profile(Binning),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Booking {
    pub entries: Vec<(String, Shape)>,
}

// Value axes shared by several metrics
const COUNT   : Binning = Binning::new( 100,  0.0,  100.0);
const E_SIM   : Binning = Binning::new( 100,  0.0,   20.0);
const T_SIM   : Binning = Binning::new( 100,  0.0,   50.0);
const COUNTS  : Binning = Binning::new(1024,  0.0, 1024.0);
const COUNTS_C: Binning = Binning::new( 128,  0.0, 1024.0);
const TOA     : Binning = Binning::new( 250,  0.0,   25.0);
const AMP     : Binning = Binning::new( 100,  0.0,  600.0);

impl Booking {

    /// Everything `Aggregator` emits, for a region with spatial axes `axes`
    pub fn for_axes(axes: &CellAxes) -> Self {
        let &CellAxes { phi, eta, abs_eta } = axes;
        let mut b = Self::default();

        // --- SIM
        b.h1("h_n_sim_trk" , Binning::new(10, 0.0, 10.0));
        b.h1("h_n_sim_cell", COUNT);
        b.h1("h_t_sim", Binning::new(500,  0.0 , 50.0 ));
        b.h1("h_e_sim", Binning::new(200,  0.0 , 20.0 ));
        b.h1("h_x_sim", Binning::new(290, -1.45,  1.45));
        b.h1("h_y_sim", Binning::new(600, -30.0, 30.0 ));
        b.h1("h_z_sim", Binning::new(400, -2.0 ,  2.0 ));
        b.h2("h_occupancy_sim", phi, eta);
        b.h1("h_phi_sim", phi);
        b.h1("h_eta_sim", eta);
        b.h2("h_t_e_sim"  , E_SIM  , T_SIM);
        b.h2("h_e_eta_sim", abs_eta, E_SIM);
        b.h2("h_t_eta_sim", abs_eta, T_SIM);
        b.h2("h_e_phi_sim", phi    , E_SIM);
        b.h2("h_t_phi_sim", phi    , T_SIM);
        b.profile("p_t_e_sim"  , E_SIM);
        b.profile("p_e_eta_sim", abs_eta);
        b.profile("p_t_eta_sim", abs_eta);
        b.profile("p_e_phi_sim", phi);
        b.profile("p_t_phi_sim", phi);

        for side in Side::BOTH {
            let s = |name: &str| side.metric(name);

            // --- DIGI
            b.h1(&s("h_n_digi") , COUNT);
            b.h1(&s("h_t1_digi"), COUNTS);
            b.h1(&s("h_t2_digi"), COUNTS);
            b.h1(&s("h_e_digi") , COUNTS);
            b.h2(&s("h_occupancy_digi"), phi, eta);
            b.h1(&s("h_phi_digi"), phi);
            b.h1(&s("h_eta_digi"), eta);
            b.h2(&s("h_t1_e_digi")  , COUNTS_C, COUNTS_C);
            b.h2(&s("h_t2_e_digi")  , COUNTS_C, COUNTS_C);
            b.h2(&s("h_e_eta_digi") , abs_eta , COUNTS_C);
            b.h2(&s("h_t1_eta_digi"), abs_eta , COUNTS_C);
            b.h2(&s("h_t2_eta_digi"), abs_eta , COUNTS_C);
            b.h2(&s("h_e_phi_digi") , phi     , COUNTS_C);
            b.h2(&s("h_t1_phi_digi"), phi     , COUNTS_C);
            b.h2(&s("h_t2_phi_digi"), phi     , COUNTS_C);
            b.profile(&s("p_t1_e_digi")  , COUNTS_C);
            b.profile(&s("p_t2_e_digi")  , COUNTS_C);
            b.profile(&s("p_e_eta_digi") , abs_eta);
            b.profile(&s("p_t1_eta_digi"), abs_eta);
            b.profile(&s("p_t2_eta_digi"), abs_eta);
            b.profile(&s("p_e_phi_digi") , phi);
            b.profile(&s("p_t1_phi_digi"), phi);
            b.profile(&s("p_t2_phi_digi"), phi);

            // --- Uncalibrated RECO
            b.h1(&s("h_n_ureco"), COUNT);
            b.h2(&s("h_occupancy_ureco"), phi, eta);
            b.h1(&s("h_t_ureco")       , TOA);
            b.h1(&s("h_t_ureco_uncorr"), TOA);
            b.h1(&s("h_e_ureco"), Binning::new(300, 0.0, 600.0));
            b.h2(&s("h_t_amp_ureco"), AMP, Binning::new(400, 0.0, 20.0));
            b.profile(&s("p_t_amp_ureco"), AMP);
        }

        // --- RECO
        b.h1("h_n_reco", COUNT);
        b.h2("h_occupancy_reco", phi, eta);
        b.h1("h_t_reco"       , TOA);
        b.h1("h_t_reco_uncorr", TOA);
        b.h1("h_e_reco", Binning::new(200, 0.0, 20.0));
        b.h1("h_t_res"       , Binning::new(700, -2.0, 5.0));
        b.h1("h_t_res_uncorr", Binning::new(700, -2.0, 5.0));
        b.h1("h_e_res"       , Binning::new(200, -1.0, 1.0));
        b.h2("h_t_reco_sim", Binning::new(100, -1.0, 25.0), Binning::new(100, 0.0, 25.0));
        b.h2("h_e_reco_sim", E_SIM, E_SIM);

        b
    }

    pub fn shape(&self, name: &str) -> Option<Shape> {
        self.entries.iter().find(|(n, _)| n == name).map(|&(_, shape)| shape)
    }

    fn h1     (&mut self, name: &str, x: Binning)              { self.add(name, Shape::H1(x))      }
    fn h2     (&mut self, name: &str, x: Binning, y: Binning)  { self.add(name, Shape::H2(x, y))   }
    fn profile(&mut self, name: &str, x: Binning)              { self.add(name, Shape::Profile(x)) }
    fn add    (&mut self, name: &str, shape: Shape)            { self.entries.push((name.to_owned(), shape)) }
}
