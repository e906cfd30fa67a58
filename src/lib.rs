pub mod configuration;

pub mod efficiency {
    pub mod efficiencyerror;
    pub mod efficiency;
    pub mod piecewiseconstant;
    pub mod cubicsplineefficiency;
    pub mod binnedefficiency;
    pub mod thresholdefficiency;
    pub mod efficiencymanager;
}

pub mod manager {
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod banded {
        pub mod bandedsystem;
        pub mod tridiagonalsystem;
        pub mod pentadiagonalsystem;
    }

    pub mod gaussconvolution {
        pub mod faddeeva;
        pub mod gaussmoments;
        pub mod piecewiseconvolution;
    }

    pub mod spline {
        pub mod splineerror;
        pub mod cubicpolynomial;
        pub mod knotvector;
        pub mod boundaryconditions;
        pub mod coefficientsolver;
        pub mod coefficientsource;
        pub mod cubicsplineknot;
        pub mod expintegral;
    }
}

pub mod parameter {
    pub mod parametererror;
    pub mod parameter;
}

pub mod resolution {
    pub mod generationerror;
    pub mod decaybasis;
    pub mod gaussefficiencymodel;
    pub mod acceptancegenerator;
    pub mod resolutionmanager;
}
